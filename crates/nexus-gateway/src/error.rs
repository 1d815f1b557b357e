//! Error taxonomy and the structured error payloads shown in place of output.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

/// Stable error code for a missing payload
pub const PAYLOAD_MISSING: &str = "PAYLOAD_MISSING";

/// Error tag rendered for every failure past validation
pub const INTERNAL_GATEWAY_ERROR: &str = "INTERNAL_GATEWAY_ERROR";

const PAYLOAD_MISSING_MESSAGE: &str =
    "Input buffer is void. Please provide a valid payload or query.";

/// Errors that can end an attempt
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error("API key is missing from environment variables ({0}).")]
    Configuration(String),
    #[error("Empty response from Nexus Core.")]
    EmptyResponse,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Invocation was cancelled before the model responded")]
    Cancelled,
}

/// Failures talking to the remote model endpoint
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Model API returned error: {message} (status: {status})")]
    Api { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Coarse classification surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "ConfigurationError")]
    Configuration,
    #[serde(rename = "EmptyResponseError")]
    EmptyResponse,
    #[serde(rename = "TransportError")]
    Transport,
    #[serde(rename = "CancelledError")]
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::EmptyResponse => "EmptyResponseError",
            ErrorKind::Transport => "TransportError",
            ErrorKind::Cancelled => "CancelledError",
        }
    }
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::Configuration(_) => ErrorKind::Configuration,
            GatewayError::EmptyResponse => ErrorKind::EmptyResponse,
            GatewayError::Transport(_) => ErrorKind::Transport,
            GatewayError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Validation failure for an empty input buffer
    pub fn payload_missing() -> Self {
        GatewayError::Validation(PAYLOAD_MISSING_MESSAGE.to_string())
    }
}

/// Payload rendered when validation refuses an attempt
#[derive(Debug, Clone, Serialize)]
pub struct ValidationPayload {
    pub status: &'static str,
    pub error_code: &'static str,
    pub message: String,
    pub timestamp: String,
}

impl ValidationPayload {
    pub fn payload_missing(now: DateTime<Utc>) -> Self {
        Self {
            status: "error",
            error_code: PAYLOAD_MISSING,
            message: PAYLOAD_MISSING_MESSAGE.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Payload rendered for any failure past validation
#[derive(Debug, Clone, Serialize)]
pub struct InternalErrorPayload {
    pub error: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&GatewayError> for InternalErrorPayload {
    fn from(err: &GatewayError) -> Self {
        Self {
            error: INTERNAL_GATEWAY_ERROR,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Pretty-print a payload the way the console displays it
pub fn render_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| {
        format!("{{\"status\":\"error\",\"error_code\":\"{INTERNAL_GATEWAY_ERROR}\"}}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_missing_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let rendered = render_payload(&ValidationPayload::payload_missing(now));
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["error_code"], "PAYLOAD_MISSING");
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00.000Z");
        // Field order follows the struct
        assert!(rendered.find("status").unwrap() < rendered.find("error_code").unwrap());
    }

    #[test]
    fn test_internal_payload_carries_kind() {
        let err = GatewayError::Configuration("API_KEY".to_string());
        let value = serde_json::to_value(InternalErrorPayload::from(&err)).unwrap();

        assert_eq!(value["error"], "INTERNAL_GATEWAY_ERROR");
        assert_eq!(value["kind"], "ConfigurationError");
        assert!(value["message"].as_str().unwrap().contains("API_KEY"));
    }

    #[test]
    fn test_transport_errors_keep_their_message() {
        let err: GatewayError = TransportError::Api {
            status: 429,
            message: "Resource exhausted".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "Model API returned error: Resource exhausted (status: 429)"
        );
    }
}
