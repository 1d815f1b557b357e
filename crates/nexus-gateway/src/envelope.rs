//! Request envelope builder.
//!
//! Turns the console input into the subject text handed to the model. The raw
//! variant is sent as typed (trimmed); the structured variant is wrapped in a
//! small JSON document carrying the network context next to the payload.

use crate::error::GatewayError;
use crate::types::{AttemptInput, HttpMethod, RequestTab, SimulatedRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

/// Network context of a structured request
#[derive(Debug, Serialize)]
struct NetworkContext<'a> {
    method: HttpMethod,
    path: &'a str,
    headers: &'a str,
    generated_at: String,
}

/// Structured subject document
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    network_context: NetworkContext<'a>,
    payload: &'a str,
}

/// Build the subject for an attempt.
///
/// Refuses with a validation error when the active input is empty. In the
/// structured variant only the body tab is checked.
pub fn build_subject(input: &AttemptInput, now: DateTime<Utc>) -> Result<String, GatewayError> {
    match input {
        AttemptInput::Raw(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(GatewayError::payload_missing());
            }
            Ok(trimmed.to_string())
        }
        AttemptInput::Structured {
            request,
            active_tab,
        } => {
            if *active_tab == RequestTab::Body && request.body.trim().is_empty() {
                return Err(GatewayError::payload_missing());
            }
            if let Some(problem) = header_diagnostics(&request.headers) {
                warn!("Passing headers through unvalidated: {}", problem);
            }
            Ok(structured_subject(request, now))
        }
    }
}

fn structured_subject(request: &SimulatedRequest, now: DateTime<Utc>) -> String {
    let envelope = Envelope {
        network_context: NetworkContext {
            method: request.method,
            path: &request.path,
            headers: &request.headers,
            generated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        payload: &request.body,
    };
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Describe why header text does not look like a JSON object, if it doesn't.
///
/// Purely advisory: headers are always forwarded verbatim.
pub fn header_diagnostics(headers: &str) -> Option<String> {
    let trimmed = headers.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(_)) => None,
        Ok(other) => Some(format!(
            "headers should be a JSON object, found {}",
            json_type_name(&other)
        )),
        Err(e) => Some(format!("headers are not valid JSON: {e}")),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()
    }

    fn structured(body: &str, tab: RequestTab) -> AttemptInput {
        AttemptInput::Structured {
            request: SimulatedRequest {
                method: HttpMethod::Post,
                path: "/hooks/signup".to_string(),
                headers: "{\"X-Trace\": \"abc\"}".to_string(),
                body: body.to_string(),
            },
            active_tab: tab,
        }
    }

    #[test]
    fn test_raw_input_is_trimmed() {
        let subject = build_subject(&AttemptInput::Raw("  hello world \n".into()), fixed_now());
        assert_eq!(subject.unwrap(), "hello world");
    }

    #[test]
    fn test_blank_raw_input_is_refused() {
        let err = build_subject(&AttemptInput::Raw(" \n\t ".into()), fixed_now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_structured_subject_layout() {
        let subject = build_subject(&structured("{\"id\": 1}", RequestTab::Body), fixed_now())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&subject).unwrap();

        assert_eq!(value["network_context"]["method"], "POST");
        assert_eq!(value["network_context"]["path"], "/hooks/signup");
        // Headers travel as the text the user typed, not as parsed JSON
        assert_eq!(value["network_context"]["headers"], "{\"X-Trace\": \"abc\"}");
        assert_eq!(
            value["network_context"]["generated_at"],
            "2024-05-17T08:30:00.000Z"
        );
        assert_eq!(value["payload"], "{\"id\": 1}");
    }

    #[test]
    fn test_empty_body_refused_only_on_body_tab() {
        assert!(build_subject(&structured("", RequestTab::Body), fixed_now()).is_err());
        assert!(build_subject(&structured("", RequestTab::Headers), fixed_now()).is_ok());
    }

    #[test]
    fn test_header_diagnostics() {
        assert!(header_diagnostics("").is_none());
        assert!(header_diagnostics("{\"Accept\": \"*/*\"}").is_none());
        assert!(header_diagnostics("[1, 2]").unwrap().contains("an array"));
        assert!(header_diagnostics("Accept: */*").unwrap().contains("not valid JSON"));
    }
}
