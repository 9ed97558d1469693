use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::{
    client::{LlmClient, SpeechClient},
    error::LlmError,
    openai::types::{
        OpenAiChatCompletionRequest, OpenAiChatCompletionResponse, OpenAiErrorResponse,
        OpenAiMessage, OpenAiRole, OpenAiSpeechRequest, OpenAiTranscriptionResponse,
    },
    types::{AudioInput, CompletionRequest, CompletionResponse, Role, Usage},
};

const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const TTS_MODEL: &str = "tts-1";
const TTS_VOICE: &str = "alloy";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// OpenAI LLM and speech client
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the chat model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn auth_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        Ok(headers)
    }

    /// Create a chat completion using the OpenAI Chat Completions API
    pub async fn create_chat_completion(
        &self,
        request: OpenAiChatCompletionRequest,
    ) -> Result<OpenAiChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "Sending chat completion request");

        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Chat gets a tighter deadline than the 60s client default used
        // for audio transfers
        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| LlmError::Network { source: e })?;
            let openai_response: OpenAiChatCompletionResponse = serde_json::from_str(&text)?;
            Ok(openai_response)
        } else {
            // Extract retry-after header before consuming the response
            let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                response
                    .headers()
                    .get("retry-after")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
            } else {
                None
            };

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Chat completion request failed");

            Err(map_error_response(status, &error_text, retry_after))
        }
    }
}

/// Map an unsuccessful OpenAI response to an LlmError
fn map_error_response(
    status: reqwest::StatusCode,
    error_text: &str,
    retry_after: Option<u64>,
) -> LlmError {
    let message = serde_json::from_str::<OpenAiErrorResponse>(error_text)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| error_text.to_string());

    match status {
        reqwest::StatusCode::BAD_REQUEST => LlmError::invalid_request(message),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            LlmError::authentication(message)
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limit(message, retry_after),
        _ => LlmError::api_error(status.as_u16(), message),
    }
}

fn to_openai_role(role: Role) -> OpenAiRole {
    match role {
        Role::User => OpenAiRole::User,
        Role::Assistant => OpenAiRole::Assistant,
        Role::System => OpenAiRole::System,
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OpenAiMessage {
                role: OpenAiRole::System,
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| OpenAiMessage {
            role: to_openai_role(m.role),
            content: m.content.clone(),
        }));

        let openai_request = OpenAiChatCompletionRequest {
            model: request.model,
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
        };

        let response = self.create_chat_completion(openai_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::internal("Response contained no choices"))?;

        Ok(CompletionResponse {
            content: choice.message.content.trim().to_string(),
            role: Role::Assistant,
            usage: Usage {
                input_tokens: response.usage.prompt_tokens,
                output_tokens: response.usage.completion_tokens,
            },
            stop_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechClient for OpenAiClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, LlmError> {
        let url = format!("{}/v1/audio/speech", self.base_url);
        debug!(chars = text.chars().count(), "Sending speech synthesis request");

        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = OpenAiSpeechRequest {
            model: TTS_MODEL.to_string(),
            voice: TTS_VOICE.to_string(),
            input: text.to_string(),
        };

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| LlmError::Network { source: e })?;
            Ok(bytes.to_vec())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(map_error_response(status, &error_text, None))
        }
    }

    async fn transcribe(&self, audio: AudioInput) -> Result<String, LlmError> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        let headers = self.auth_headers()?;

        let file_part = reqwest::multipart::Part::bytes(audio.data)
            .file_name(audio.filename)
            .mime_str(&audio.content_type)
            .map_err(|_| LlmError::invalid_request("Invalid audio content type"))?;

        let form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", file_part);

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();
        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| LlmError::Network { source: e })?;
            let transcription: OpenAiTranscriptionResponse = serde_json::from_str(&text)?;
            Ok(transcription.text)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(map_error_response(status, &error_text, None))
        }
    }
}
