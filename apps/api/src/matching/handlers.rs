use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::transcript::{build_transcript, ChatTurn};
use crate::errors::AppError;
use crate::matching::profile::NeedsProfile;
use crate::matching::questions::{resolve_category, QuestionQuery};
use crate::matching::ranking::RankedEntry;
use crate::models::question::Question;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResourceMatchRequest {
    pub transcript: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct ResourceMatchResponse {
    pub request_id: Uuid,
    pub profile: NeedsProfile,
    pub results: Vec<RankedEntry>,
    pub scorer_backend: &'static str,
}

#[derive(Deserialize)]
pub struct QuestionSelectRequest {
    pub category: Option<String>,
    pub transcript: Option<String>,
    #[serde(default)]
    pub has_rapport: bool,
}

#[derive(Serialize)]
pub struct QuestionSelectResponse {
    pub category: String,
    pub fallback: bool,
    pub questions: Vec<Question>,
}

/// POST /api/v1/resources
///
/// An empty transcript is valid and yields an empty profile.
pub async fn handle_match_resources(
    State(state): State<AppState>,
    Json(req): Json<ResourceMatchRequest>,
) -> Json<ResourceMatchResponse> {
    let request_id = Uuid::new_v4();
    let transcript = build_transcript(&req.history, &req.transcript);
    let snapshot = state.catalog.snapshot();

    let selection = state
        .engine
        .select_resources(&transcript, snapshot.resources.resources());

    info!(
        %request_id,
        needs = ?selection.profile.needs,
        ranked = selection.result.ranked_entries().count(),
        safety = selection.result.safety_entries().count(),
        "Resources matched"
    );

    Json(ResourceMatchResponse {
        request_id,
        profile: selection.profile,
        results: selection.result.entries,
        scorer_backend: state.engine.scorer_backend(),
    })
}

impl QuestionSelectRequest {
    fn into_query(self) -> Result<QuestionQuery, AppError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_blank(self.category), non_blank(self.transcript)) {
            (Some(category), None) => Ok(QuestionQuery::Category(category)),
            (None, Some(transcript)) => Ok(QuestionQuery::Transcript(transcript)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "provide either category or transcript, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "category or transcript is required".to_string(),
            )),
        }
    }
}

/// POST /api/v1/questions/select
///
/// An unknown category returns an empty list, not an error.
pub async fn handle_select_questions(
    State(state): State<AppState>,
    Json(req): Json<QuestionSelectRequest>,
) -> Result<Json<QuestionSelectResponse>, AppError> {
    let has_rapport = req.has_rapport;
    let query = req.into_query()?;
    let snapshot = state.catalog.snapshot();

    let choice = resolve_category(&query, &state.engine.vocabulary().question_routing);
    let questions = state
        .engine
        .select_questions(&snapshot.questions, &query, has_rapport);

    Ok(Json(QuestionSelectResponse {
        category: choice.category,
        fallback: choice.fallback,
        questions,
    }))
}
