use advisor_core::{SectionProgress, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub completed_steps: Vec<String>,
    pub business_plan_progress: Vec<SectionProgress>,
    pub initial_form_complete: bool,
    pub form_data: BTreeMap<String, serde_json::Value>,
    pub email_collected: bool,
    pub report_sent: bool,
    pub points: u32,
    pub current_tier: String,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Serialize)]
pub struct StructureResponse {
    pub business_plan_progress: Vec<SectionProgress>,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    /// Base64-encoded mp3
    pub audio: String,
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    /// Base64-encoded audio payload
    pub audio: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendReportRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendReportResponse {
    pub message: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadReportQuery {
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
