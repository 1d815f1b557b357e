//! Integration tests for the Gemini backend against a mock HTTP server.

use nexus_gateway::{
    AttemptRequest, AttemptStatus, ErrorKind, Gateway, GatewayConfig, GeminiBackend,
    GenerationRequest, InvocationService, ModelBackend, OperationMode, OutputFormat,
    StaticCredentials, TransportError,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";

fn request<'a>() -> GenerationRequest<'a> {
    GenerationRequest {
        subject: "User signed up",
        instruction: "You are a gateway",
        temperature: 0.1,
        max_output_tokens: 2048,
    }
}

fn text_response(parts: &[&str]) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": parts.iter().map(|t| json!({ "text": t })).collect::<Vec<_>>()
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_instruction_and_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .and(header("x-goog-api-key", "secret"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are a gateway" }] },
            "contents": [{ "role": "user", "parts": [{ "text": "User signed up" }] }],
            "generationConfig": { "maxOutputTokens": 2048 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["{\"ok\":", "true}"])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(&server.uri(), MODEL);
    let text = backend.generate("secret", &request()).await.unwrap();
    assert_eq!(text.as_deref(), Some("{\"ok\":true}"));
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(&server.uri(), MODEL);
    match backend.generate("bad", &request()).await {
        Err(TransportError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(&server.uri(), MODEL);
    let err = backend.generate("secret", &request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Parse(_)));
}

#[tokio::test]
async fn test_blocked_prompt_becomes_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let mut config = GatewayConfig::default();
    config.model.base_url = server.uri();
    config.model.name = MODEL.to_string();
    let service = InvocationService::new(
        Arc::new(GeminiBackend::new(&config.model.base_url, &config.model.name)),
        Box::new(StaticCredentials(Some("secret".to_string()))),
        &config.model,
    );

    let err = service.invoke("subject", "instruction", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResponse);
}

#[tokio::test]
async fn test_full_attempt_against_mock_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response(&[r#"{"event":"signup","user_id":992}"#])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = GatewayConfig::default();
    config.model.base_url = server.uri();
    config.model.name = MODEL.to_string();
    let service = InvocationService::new(
        Arc::new(GeminiBackend::new(&config.model.base_url, &config.model.name)),
        Box::new(StaticCredentials(Some("secret".to_string()))),
        &config.model,
    );
    let mut gateway = Gateway::new(Arc::new(service));

    let request = AttemptRequest::raw(
        OperationMode::Normalization,
        OutputFormat::Json,
        "User John Doe (ID: 992) signed up",
    );
    assert_eq!(gateway.execute(&request).await, AttemptStatus::Success);
    assert_eq!(
        gateway.result().unwrap().display_text,
        "{\n  \"event\": \"signup\",\n  \"user_id\": 992\n}"
    );
}
