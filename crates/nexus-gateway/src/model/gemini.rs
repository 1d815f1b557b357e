//! Google Gemini `generateContent` backend.

use super::{GenerationRequest, ModelBackend};
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gemini REST backend (non-streaming)
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Handle error responses
    async fn handle_error<T>(&self, resp: reqwest::Response) -> Result<T, TransportError> {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.error.message,
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => format!("Request failed with status {}", status),
        };
        Err(TransportError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, TransportError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: request.subject,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::Connection(format!("Cannot connect to {}", self.base_url))
                } else {
                    TransportError::Request(e)
                }
            })?;

        if !resp.status().is_success() {
            return self.handle_error(resp).await;
        }

        let text = resp.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| TransportError::Parse(e.to_string()))?;

        debug!(
            model = %self.model,
            candidates = parsed.candidates.len(),
            "Model responded"
        );

        Ok(extract_text(parsed))
    }
}

/// Concatenate the first candidate's text parts, skipping thoughts
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let backend = GeminiBackend::new("https://test.api.com/v1beta/", "gemini-custom");
        assert_eq!(backend.base_url(), "https://test.api.com/v1beta");
        assert_eq!(
            backend.endpoint(),
            "https://test.api.com/v1beta/models/gemini-custom:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "persona" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "subject" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 2048,
            },
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "persona");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [
                        {"text": "thinking...", "thought": true},
                        {"text": "{\"a\":"},
                        {"text": "1}"}
                    ]}},
                    {"content": {"parts": [{"text": "ignored"}]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_text_handles_blocked_response() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(extract_text(response).is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#).unwrap();
        assert!(extract_text(response).is_none());
    }
}
