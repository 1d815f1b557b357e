//! Instruction assembly.
//!
//! The instruction is the fixed persona block followed by the mode, routing,
//! format and (optional) rules directives, in that order. Destination and
//! rules are interpolated verbatim; nothing is escaped or truncated.

use crate::types::{OperationMode, OutputFormat};

/// Fixed persona block defining the model's behavior and output contracts
pub const SYSTEM_PERSONA_PROMPT: &str = r##"
Core Objective

To function as an intelligent parsing and routing layer within an API Gateway architecture. You will ingest raw payloads (from webhooks, external APIs, or Puter.js client requests), normalize the data structures, generate CORS-compliant proxy configurations, and output strict formatted data for downstream automation tools.

## 1. Persona & Tone

* **Voice:** Technical, Precision-Engineered, Stack-Agnostic.
* **Audience:** DevOps Engineers, n8n Workflow Builders, Full-Stack Developers.
* **Behavioral Style:** Analytical, Security-Conscious, Code-First. You do not "chat"; you compute, transform, and configure.

## 2. Operational Rules

1. **CORS Enforcement:** When diagnosing Puter.js or browser-based API connection issues, always assume the environment enforces Same-Origin Policy.
2. **Payload Normalization:** Irrespective of the input format (messy text, XML, unstructured logs), you must extract key entities and transform them into flat, standardized JSON.
3. **Security First:** Never output API keys or credentials in plain text. Use placeholders (e.g., <YOUR_API_KEY>).
4. **Error Handling:** If an input payload is malformed, output a JSON error object.

## 3. Knowledge Boundaries & Guardrails

* **Allowed Topics:** JSON Schema, HTTP methods, CORS headers, n8n webhook structures, Cloudflare Workers, Puter.js, cURL.
* **Fallout Protocol:** If the input is ambiguous, return: {"error": "INVALID_PAYLOAD", "message": "Input does not match API context."}

## 4. Output Format Compliance

You will receive a strict "Output Format" instruction. You must adhere to it:

* **JSON:** Output strictly valid JSON.
* **JS_WORKER:** Output a standalone JavaScript ES Module (suitable for Puter.js, Cloudflare Workers, or Service Workers). It should include logic to forward/route the processed data to the "Destination URL" if provided.
* **CURL:** Output a valid, single-line cURL command that POSTs the normalized data to the "Destination URL".
* **N8N_WORKFLOW:** Output the JSON structure for an n8n workflow (specifically a 'Webhook' node or 'HTTP Request' node configuration) matching the input data structure.

## 5. Interaction Examples

### Example: JS Worker Routing
User: "Input: User Signup. Destination: https://api.crm.com/v1"
AI:
```javascript
export default {
  async fetch(request) {
    const payload = { "event": "signup", "timestamp": new Date().toISOString() };
    // Routing Logic
    return fetch("https://api.crm.com/v1", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(payload)
    });
  }
}
```

### Example: cURL Routing
User: "Input: {id:1}. Destination: https://webhook.site/abc"
AI:
```bash
curl -X POST "https://webhook.site/abc" -H "Content-Type: application/json" -d '{"id":1,"status":"normalized"}'
```
"##;

/// Dynamic parts of an instruction
#[derive(Debug, Clone, Copy)]
pub struct Directives<'a> {
    pub mode: OperationMode,
    pub destination: Option<&'a str>,
    pub format: OutputFormat,
    pub rules: Option<&'a str>,
}

/// Compose the full instruction with the built-in persona
pub fn compose(directives: &Directives<'_>) -> String {
    compose_with_persona(SYSTEM_PERSONA_PROMPT, directives)
}

/// Compose the full instruction with a caller-supplied persona
pub fn compose_with_persona(persona: &str, directives: &Directives<'_>) -> String {
    let mut prompt = String::with_capacity(persona.len() + 512);

    prompt.push_str(persona.trim_end());
    prompt.push_str("\n\n");

    prompt.push_str("[CURRENT OPERATION CONTEXT]: ");
    prompt.push_str(directives.mode.task_directive());
    prompt.push('\n');

    prompt.push_str(&routing_directive(directives.destination));
    prompt.push('\n');

    prompt.push_str("[REQUIRED OUTPUT FORMAT]: ");
    prompt.push_str(directives.format.as_str());
    prompt.push('\n');

    if let Some(rules) = non_blank(directives.rules) {
        prompt.push_str(
            "[TRANSFORMATION RULES]: Apply the following user-defined rules strictly:\n",
        );
        prompt.push_str(rules);
        prompt.push('\n');
    }

    prompt
}

/// The model must never guess a destination, so its absence is stated.
fn routing_directive(destination: Option<&str>) -> String {
    match non_blank(destination) {
        Some(dest) => format!("[ROUTING TARGET]: Route processed data to: \"{dest}\""),
        None => "[ROUTING TARGET]: No external destination set. Return processed result locally. Do not invent a destination.".to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives<'a>(destination: Option<&'a str>, rules: Option<&'a str>) -> Directives<'a> {
        Directives {
            mode: OperationMode::CorsProxy,
            destination,
            format: OutputFormat::Curl,
            rules,
        }
    }

    #[test]
    fn test_directive_order() {
        let prompt = compose(&directives(Some("https://hooks.example.com/in"), Some("drop nulls")));

        let persona = prompt.find("Core Objective").unwrap();
        let mode = prompt.find("[CURRENT OPERATION CONTEXT]").unwrap();
        let routing = prompt.find("[ROUTING TARGET]").unwrap();
        let format = prompt.find("[REQUIRED OUTPUT FORMAT]: CURL").unwrap();
        let rules = prompt.find("[TRANSFORMATION RULES]").unwrap();

        assert!(persona < mode && mode < routing && routing < format && format < rules);
        assert!(prompt.contains("Task: Generate CORS configuration/Proxy code."));
        assert!(prompt.contains("Route processed data to: \"https://hooks.example.com/in\""));
        assert!(prompt.ends_with("drop nulls\n"));
    }

    #[test]
    fn test_persona_keeps_allowed_topics() {
        assert!(SYSTEM_PERSONA_PROMPT
            .contains("* **Allowed Topics:** JSON Schema, HTTP methods, CORS headers, n8n webhook structures, Cloudflare Workers, Puter.js, cURL."));
        assert!(SYSTEM_PERSONA_PROMPT.contains("(suitable for Puter.js, Cloudflare Workers, or Service Workers)"));
        assert!(SYSTEM_PERSONA_PROMPT.contains("When diagnosing Puter.js or browser-based API connection issues"));
    }

    #[test]
    fn test_missing_destination_is_explicit() {
        for dest in [None, Some(""), Some("   ")] {
            let prompt = compose(&directives(dest, None));
            assert!(prompt.contains("No external destination set"));
            assert!(!prompt.contains("Route processed data to"));
        }
    }

    #[test]
    fn test_rules_omitted_when_blank() {
        let prompt = compose(&directives(None, Some("  ")));
        assert!(!prompt.contains("[TRANSFORMATION RULES]"));
    }

    #[test]
    fn test_destination_is_not_escaped() {
        let prompt = compose_with_persona(
            "persona",
            &directives(Some("https://x.test/\"quoted\""), None),
        );
        assert!(prompt.starts_with("persona\n\n"));
        assert!(prompt.contains("to: \"https://x.test/\"quoted\"\""));
    }
}
