use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::resources::ResourceCatalog;
use crate::chat::responder::ChatContext;
use crate::chat::transcript::{build_transcript, ChatTurn};
use crate::errors::AppError;
use crate::matching::questions::QuestionQuery;
use crate::matching::ranking::RankedResult;
use crate::models::question::Question;
use crate::models::resource::{PhoneNumber, Phones, Resource, ResourceRecord};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub request_id: Uuid,
    pub response: String,
    pub generated_by: &'static str,
    pub resources: Vec<ResourceRecord>,
    pub questions: Vec<Question>,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let request_id = Uuid::new_v4();
    let transcript = build_transcript(&req.history, message);
    let snapshot = state.catalog.snapshot();

    let selection = state
        .engine
        .select_resources(&transcript, snapshot.resources.resources());
    let resources = catalog_records(&snapshot.resources, &selection.result);
    let questions = state.engine.select_questions(
        &snapshot.questions,
        &QuestionQuery::Transcript(transcript),
        false,
    );

    info!(
        %request_id,
        resources = resources.len(),
        questions = questions.len(),
        "Chat context assembled"
    );

    let context = ChatContext {
        resources,
        questions,
    };
    let reply = state.responder.respond(message, &req.history, &context).await;

    Ok(Json(ChatResponse {
        request_id,
        response: reply.message,
        generated_by: reply.generated_by,
        resources: context.resources,
        questions: context.questions,
    }))
}

const SAFETY_NUMBERS: [&str; 2] = ["911", "988"];

/// Maps ranked entries back to full catalog records. A safety entry with no
/// record is kept as a bare record carrying its hotline.
fn catalog_records(catalog: &ResourceCatalog, result: &RankedResult) -> Vec<ResourceRecord> {
    result
        .entries
        .iter()
        .filter_map(|entry| match catalog.find_by_name(&entry.resource.name) {
            Some(record) => Some(record.clone()),
            None if entry.safety => Some(safety_record(&entry.resource)),
            None => {
                debug!("No catalog record for ranked resource '{}'", entry.resource.name);
                None
            }
        })
        .collect()
}

fn safety_record(resource: &Resource) -> ResourceRecord {
    let hotline = SAFETY_NUMBERS
        .into_iter()
        .find(|number| resource.mentions(number))
        .map(|number| PhoneNumber {
            number: Some(number.to_string()),
            kind: Some("hotline".to_string()),
        });

    ResourceRecord {
        name: Some(resource.name.clone()),
        description: resource.description.as_deref().map(str::to_string),
        phones: hotline.map(|hotline| Phones {
            hotline: Some(hotline),
            ..Phones::default()
        }),
        ..ResourceRecord::default()
    }
}
