//! # Advisor LLM SDK
//!
//! Provider-agnostic client traits and types for the language and speech
//! collaborators used by the advisor, with an OpenAI implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use advisor_llm::client::LlmClient;
//! use advisor_llm::openai::OpenAiClient;
//! use advisor_llm::types::{CompletionRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiClient::new("your-api-key")?;
//!     let response = client
//!         .complete(CompletionRequest {
//!             messages: vec![Message::user("Hello!")],
//!             max_tokens: 200,
//!             model: client.model_name().to_string(),
//!             system: None,
//!             temperature: Some(0.7),
//!         })
//!         .await?;
//!     println!("Response: {}", response.content);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod openai;
pub mod types;

#[cfg(test)]
mod tests {
    use crate::openai::OpenAiClient;
    use crate::types::{Message, Role};

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAiClient::new("test-key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_openai_client_creation_empty_key() {
        let client = OpenAiClient::new("");
        assert!(client.is_err());
    }

    #[test]
    fn test_message_constructors() {
        let message = Message::user("Hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "Hello");

        let message = Message::assistant("Hi there");
        assert_eq!(message.role, Role::Assistant);

        let message = Message::system("Be nice");
        assert_eq!(message.role, Role::System);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::System.to_string(), "system");
    }
}
