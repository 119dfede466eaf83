pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::chat::handlers as chat;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching
        .route("/api/v1/resources", post(matching::handle_match_resources))
        .route("/api/v1/questions/select", post(matching::handle_select_questions))
        // Catalog browsing
        .route("/api/v1/resources/search", get(catalog::handle_search_resources))
        .route(
            "/api/v1/resources/categories/:category",
            get(catalog::handle_resources_by_category),
        )
        .route(
            "/api/v1/resources/counties/:county",
            get(catalog::handle_resources_by_county),
        )
        .route("/api/v1/questions", get(catalog::handle_list_questions))
        .route(
            "/api/v1/questions/high-priority",
            get(catalog::handle_high_priority_questions),
        )
        .route(
            "/api/v1/questions/recommendations",
            get(catalog::handle_question_recommendations),
        )
        .route("/api/v1/questions/:id", get(catalog::handle_get_question))
        .route("/api/v1/statistics", get(catalog::handle_statistics))
        .route("/api/v1/catalog/reload", post(catalog::handle_reload))
        // Chat
        .route("/api/v1/chat", post(chat::handle_chat))
        .with_state(state)
}
