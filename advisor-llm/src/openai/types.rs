//! OpenAI API types for the Chat Completions and Audio endpoints.

use serde::{Deserialize, Serialize};

/// A message in the OpenAI conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    /// Role of the message sender
    pub role: OpenAiRole,
    /// Content of the message
    pub content: String,
}

/// Role of an OpenAI message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAiRole {
    /// System message
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// OpenAI Chat Completions API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChatCompletionRequest {
    /// The model to use for generation
    pub model: String,
    /// Conversation messages, system instruction first
    pub messages: Vec<OpenAiMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// OpenAI Chat Completions API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChatCompletionResponse {
    /// Response identifier
    pub id: String,
    /// The model that produced the response
    pub model: String,
    /// Generated choices
    pub choices: Vec<OpenAiChoice>,
    /// Token usage information
    pub usage: OpenAiUsage,
}

/// A single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChoice {
    /// Index of the choice
    pub index: u32,
    /// The generated message
    pub message: OpenAiMessage,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,
    /// Number of completion tokens
    pub completion_tokens: u32,
    /// Total number of tokens
    pub total_tokens: u32,
}

/// OpenAI speech synthesis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSpeechRequest {
    /// The TTS model to use
    pub model: String,
    /// Voice preset
    pub voice: String,
    /// Text to synthesize
    pub input: String,
}

/// OpenAI transcription response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiTranscriptionResponse {
    /// Transcribed text
    pub text: String,
}

/// OpenAI error response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiErrorResponse {
    /// The error payload
    pub error: OpenAiErrorDetail,
}

/// OpenAI error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiErrorDetail {
    /// Human-readable error message
    pub message: String,
    /// Error type string
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// Provider error code
    pub code: Option<String>,
}
