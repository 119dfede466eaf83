use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::question_bank::{QuestionBankStatistics, QuestionFilter};
use crate::catalog::resources::ResourceQuery;
use crate::catalog::CatalogSnapshot;
use crate::errors::AppError;
use crate::models::question::Question;
use crate::models::resource::ResourceRecord;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResourceSearchResponse {
    pub total: usize,
    pub resources: Vec<ResourceRecord>,
}

#[derive(Deserialize)]
pub struct QuestionListQuery {
    pub category: Option<String>,
    /// `false` hides rapport-gated questions.
    pub has_rapport: Option<bool>,
    pub escalation_tier: Option<u8>,
    pub risk_level: Option<String>,
    pub tone: Option<String>,
}

#[derive(Deserialize)]
pub struct HighPriorityQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub category: String,
    pub escalation_tier: Option<u8>,
    #[serde(default)]
    pub has_rapport: bool,
}

#[derive(Serialize)]
pub struct QuestionListResponse {
    pub total: usize,
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
pub struct QuestionDetailResponse {
    pub category: String,
    pub question: Question,
}

#[derive(Serialize)]
pub struct ResourceStatistics {
    pub total: usize,
    pub categories: BTreeSet<String>,
    pub counties: BTreeSet<String>,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub resources: ResourceStatistics,
    pub questions: QuestionBankStatistics,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub resources: usize,
    pub question_categories: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ResourceSearchResponse {
    fn new(records: Vec<&ResourceRecord>) -> Self {
        let resources: Vec<ResourceRecord> = records.into_iter().cloned().collect();
        Self {
            total: resources.len(),
            resources,
        }
    }
}

impl QuestionListResponse {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            total: questions.len(),
            questions,
        }
    }
}

/// GET /api/v1/resources/search
pub async fn handle_search_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Json<ResourceSearchResponse> {
    let snapshot = state.catalog.snapshot();
    Json(ResourceSearchResponse::new(snapshot.resources.filter(&query)))
}

/// GET /api/v1/resources/categories/:category
pub async fn handle_resources_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<ResourceSearchResponse> {
    let snapshot = state.catalog.snapshot();
    Json(ResourceSearchResponse::new(snapshot.resources.by_category(&category)))
}

/// GET /api/v1/resources/counties/:county
pub async fn handle_resources_by_county(
    State(state): State<AppState>,
    Path(county): Path<String>,
) -> Json<ResourceSearchResponse> {
    let snapshot = state.catalog.snapshot();
    Json(ResourceSearchResponse::new(snapshot.resources.by_county(&county)))
}

/// GET /api/v1/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionListQuery>,
) -> Json<QuestionListResponse> {
    let filter = QuestionFilter {
        category: query.category,
        escalation_tier: query.escalation_tier,
        risk_level: query.risk_level,
        tone: query.tone,
        use_after_rapport: query.has_rapport.filter(|has| !has),
        require_rapport: false,
    };
    let questions = state.catalog.snapshot().questions.filter(&filter);
    Json(QuestionListResponse::new(questions))
}

/// GET /api/v1/questions/high-priority
///
/// Tier-3 questions, across the bank or within one category.
pub async fn handle_high_priority_questions(
    State(state): State<AppState>,
    Query(query): Query<HighPriorityQuery>,
) -> Json<QuestionListResponse> {
    let questions = state
        .catalog
        .snapshot()
        .questions
        .high_priority(query.category.as_deref());
    Json(QuestionListResponse::new(questions))
}

/// GET /api/v1/questions/recommendations
pub async fn handle_question_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<QuestionListResponse>, AppError> {
    let snapshot = state.catalog.snapshot();
    if !snapshot.questions.has_category(&query.category) {
        return Err(AppError::NotFound(format!(
            "Question category '{}' not found",
            query.category
        )));
    }
    let questions =
        snapshot
            .questions
            .recommendations(&query.category, query.escalation_tier, query.has_rapport);
    Ok(Json(QuestionListResponse::new(questions)))
}

/// GET /api/v1/questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<QuestionDetailResponse>, AppError> {
    let snapshot = state.catalog.snapshot();
    let bank = &snapshot.questions;

    let question = bank
        .question_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))?;
    let category = bank.category_for_question(id).unwrap_or_default();

    Ok(Json(QuestionDetailResponse {
        category: category.to_string(),
        question: question.clone(),
    }))
}

/// GET /api/v1/statistics
pub async fn handle_statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    let snapshot = state.catalog.snapshot();
    let resources = &snapshot.resources;

    Json(StatisticsResponse {
        resources: ResourceStatistics {
            total: resources.len(),
            categories: resources.categories().into_iter().map(str::to_string).collect(),
            counties: resources.counties().into_iter().map(str::to_string).collect(),
        },
        questions: snapshot.questions.statistics(),
        loaded_at: snapshot.loaded_at,
    })
}

/// POST /api/v1/catalog/reload
///
/// File reads run on the blocking pool.
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let store = Arc::clone(&state.catalog);
    let snapshot = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(anyhow::Error::from)??;
    info!(
        "Catalog reloaded from {} at {}",
        state.config.resources_path.display(),
        snapshot.loaded_at
    );
    Ok(Json(reload_summary(&snapshot)))
}

fn reload_summary(snapshot: &CatalogSnapshot) -> ReloadResponse {
    ReloadResponse {
        resources: snapshot.resources.len(),
        question_categories: snapshot.questions.categories().len(),
        loaded_at: snapshot.loaded_at,
    }
}
