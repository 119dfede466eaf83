use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active scorer/responder backends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.catalog.snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "lifeline-api",
        "scorer": state.engine.scorer_backend(),
        "responder": state.responder.backend(),
        "resources": snapshot.resources.len(),
        "catalog_loaded_at": snapshot.loaded_at,
    }))
}
