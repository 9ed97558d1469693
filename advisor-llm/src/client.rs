use crate::{
    error::LlmError,
    types::{AudioInput, CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// Core trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Get model name (e.g., "gpt-4o-mini")
    fn model_name(&self) -> &str;
}

/// Trait for speech collaborators (text-to-speech and transcription)
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Synthesize speech audio from text, returning encoded audio bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, LlmError>;

    /// Transcribe an audio clip to text
    async fn transcribe(&self, audio: AudioInput) -> Result<String, LlmError>;
}
