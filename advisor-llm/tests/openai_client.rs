use advisor_llm::client::LlmClient;
use advisor_llm::error::LlmError;
use advisor_llm::openai::OpenAiClient;
use advisor_llm::types::{CompletionRequest, Message};

fn chat_request(client: &OpenAiClient) -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message::user("Hello")],
        max_tokens: 200,
        model: client.model_name().to_string(),
        system: Some("You are a friendly assistant.".to_string()),
        temperature: Some(0.7),
    }
}

#[tokio::test]
async fn complete_parses_chat_completion_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-123",
                "model": "gpt-4o-mini",
                "choices": [
                    {
                        "index": 0,
                        "message": {"role": "assistant", "content": "  Hi there!  "},
                        "finish_reason": "stop"
                    }
                ],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
            }"#,
        )
        .create_async()
        .await;

    let client = OpenAiClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let response = client.complete(chat_request(&client)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, "Hi there!");
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 4);
    assert_eq!(response.stop_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn complete_maps_unauthorized_to_authentication_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "Incorrect API key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new("bad-key")
        .unwrap()
        .with_base_url(server.url());

    let err = client.complete(chat_request(&client)).await.unwrap_err();
    match err {
        LlmError::Authentication { message } => assert_eq!(message, "Incorrect API key"),
        other => panic!("expected authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn complete_maps_rate_limit_with_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("retry-after", "7")
        .with_body(r#"{"error": {"message": "Slow down", "type": "rate_limit_error", "code": null}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let err = client.complete(chat_request(&client)).await.unwrap_err();
    match err {
        LlmError::RateLimit {
            message,
            retry_after,
        } => {
            assert_eq!(message, "Slow down");
            assert_eq!(retry_after, Some(7));
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn complete_maps_malformed_body_to_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "chatcmpl-789", "choices": ["#)
        .create_async()
        .await;

    let client = OpenAiClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let err = client.complete(chat_request(&client)).await.unwrap_err();
    assert!(matches!(err, LlmError::Parse { .. }));
}

#[tokio::test]
async fn complete_errors_on_empty_choices() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-456",
                "model": "gpt-4o-mini",
                "choices": [],
                "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
            }"#,
        )
        .create_async()
        .await;

    let client = OpenAiClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let err = client.complete(chat_request(&client)).await.unwrap_err();
    assert!(matches!(err, LlmError::Internal { .. }));
}
