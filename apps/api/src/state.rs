use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::chat::responder::Responder;
use crate::config::Config;
use crate::matching::MatchingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Current catalog snapshot; swapped wholesale on reload.
    pub catalog: Arc<CatalogStore>,
    /// Vocabulary and scorer are fixed for the life of the process.
    pub engine: Arc<MatchingEngine>,
    /// Pluggable responder. `LlmResponder` when an API key is configured, else `TemplateResponder`.
    pub responder: Arc<dyn Responder>,
    pub config: Config,
}
