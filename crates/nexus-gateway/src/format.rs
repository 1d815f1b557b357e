//! Response formatting.

use crate::types::OutputFormat;

/// Best-effort display text for a model response.
///
/// JSON-flavored formats are strictly parsed and re-serialized with two-space
/// indentation (key order preserved). Anything that does not parse, and every
/// other format, is returned unchanged.
pub fn format_response(raw: &str, format: OutputFormat) -> String {
    if !format.is_json_flavored() {
        return raw.to_string();
    }
    pretty_json(raw).unwrap_or_else(|| raw.to_string())
}

/// Pretty-print `text` if it is a single valid JSON document
pub fn pretty_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Whether text looks like a JSON document at a glance (for highlighting)
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_pretty_printed() {
        let raw = r#"{"user":"John Doe","id":992,"tags":["signup"]}"#;
        let display = format_response(raw, OutputFormat::Json);

        assert_eq!(
            display,
            "{\n  \"user\": \"John Doe\",\n  \"id\": 992,\n  \"tags\": [\n    \"signup\"\n  ]\n}"
        );
        let before: serde_json::Value = serde_json::from_str(raw).unwrap();
        let after: serde_json::Value = serde_json::from_str(&display).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_key_order_preserved() {
        let display = format_response(r#"{"z":1,"a":2}"#, OutputFormat::N8nWorkflow);
        assert!(display.find("\"z\"").unwrap() < display.find("\"a\"").unwrap());
    }

    #[test]
    fn test_invalid_json_passes_through() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(format_response(raw, OutputFormat::Json), raw);
    }

    #[test]
    fn test_non_json_formats_untouched() {
        let raw = r#"{"already":"json"}"#;
        assert_eq!(format_response(raw, OutputFormat::Curl), raw);
        assert_eq!(format_response(raw, OutputFormat::JsWorker), raw);

        let broken = "curl -X POST 'https://x' -d '{oops'";
        assert_eq!(format_response(broken, OutputFormat::Curl), broken);
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json("  {\"a\":1}"));
        assert!(looks_like_json("\n[1]"));
        assert!(!looks_like_json("curl -X POST"));
    }
}
