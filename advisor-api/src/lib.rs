use advisor_core::{Advisor, ReportTransport};
use advisor_llm::client::SpeechClient;
use std::sync::Arc;

pub mod config;
pub mod email;
pub mod handlers;
pub mod models;

/// Shared handler state: the turn orchestrator plus the collaborators the
/// speech and report endpoints call directly.
pub struct AppState {
    pub advisor: Arc<Advisor>,
    pub speech: Arc<dyn SpeechClient>,
    pub transport: Arc<dyn ReportTransport>,
}
