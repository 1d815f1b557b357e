//! Core selector and request types shared by every gateway component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which task the model is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationMode {
    /// Extract entities from messy input into flat JSON
    #[default]
    Normalization,
    /// Produce CORS configuration or proxy code
    CorsProxy,
    /// Explain what is wrong with a payload or error trace
    DebugAnalysis,
}

impl OperationMode {
    pub const ALL: [OperationMode; 3] = [
        OperationMode::Normalization,
        OperationMode::CorsProxy,
        OperationMode::DebugAnalysis,
    ];

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Normalization => "NORMALIZATION",
            OperationMode::CorsProxy => "CORS_PROXY",
            OperationMode::DebugAnalysis => "DEBUG_ANALYSIS",
        }
    }

    /// Short label for selectors
    pub fn label(&self) -> &'static str {
        match self {
            OperationMode::Normalization => "NORMALIZE",
            OperationMode::CorsProxy => "CORS PROXY",
            OperationMode::DebugAnalysis => "DEBUGGER",
        }
    }

    /// Task sentence injected into the instruction
    pub fn task_directive(&self) -> &'static str {
        match self {
            OperationMode::Normalization => "Task: Normalize raw data.",
            OperationMode::CorsProxy => "Task: Generate CORS configuration/Proxy code.",
            OperationMode::DebugAnalysis => "Task: Debug analysis of the payload.",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            OperationMode::Normalization => OperationMode::CorsProxy,
            OperationMode::CorsProxy => OperationMode::DebugAnalysis,
            OperationMode::DebugAnalysis => OperationMode::Normalization,
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_selector(s).as_str() {
            "NORMALIZATION" | "NORMALIZE" => Ok(OperationMode::Normalization),
            "CORS_PROXY" | "CORS" => Ok(OperationMode::CorsProxy),
            "DEBUG_ANALYSIS" | "DEBUG" | "DEBUGGER" => Ok(OperationMode::DebugAnalysis),
            _ => Err(format!(
                "Unknown operation mode: '{s}'. Expected one of: normalization, cors-proxy, debug-analysis"
            )),
        }
    }
}

/// Output contract requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputFormat {
    #[default]
    Json,
    /// Standalone JavaScript ES module, offered as a hosted script
    JsWorker,
    Curl,
    /// n8n Webhook / HTTP Request node configuration
    N8nWorkflow,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Json,
        OutputFormat::JsWorker,
        OutputFormat::Curl,
        OutputFormat::N8nWorkflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::JsWorker => "JS_WORKER",
            OutputFormat::Curl => "CURL",
            OutputFormat::N8nWorkflow => "N8N_WORKFLOW",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::JsWorker => "JS WORKER",
            OutputFormat::Curl => "CURL",
            OutputFormat::N8nWorkflow => "n8n NODE",
        }
    }

    /// Formats whose output is expected to be a JSON document
    pub fn is_json_flavored(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::N8nWorkflow)
    }

    /// Formats whose output is published as a hosted script
    pub fn is_hostable(&self) -> bool {
        matches!(self, OutputFormat::JsWorker)
    }

    pub fn next(&self) -> Self {
        match self {
            OutputFormat::Json => OutputFormat::JsWorker,
            OutputFormat::JsWorker => OutputFormat::Curl,
            OutputFormat::Curl => OutputFormat::N8nWorkflow,
            OutputFormat::N8nWorkflow => OutputFormat::Json,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_selector(s).as_str() {
            "JSON" => Ok(OutputFormat::Json),
            "JS_WORKER" | "WORKER" | "JS" => Ok(OutputFormat::JsWorker),
            "CURL" => Ok(OutputFormat::Curl),
            "N8N_WORKFLOW" | "N8N" => Ok(OutputFormat::N8nWorkflow),
            _ => Err(format!(
                "Unknown output format: '{s}'. Expected one of: json, js-worker, curl, n8n-workflow"
            )),
        }
    }
}

/// Accept `cors-proxy`, `cors_proxy` and `CORS_PROXY` alike
fn normalize_selector(s: &str) -> String {
    s.trim().replace('-', "_").to_ascii_uppercase()
}

/// HTTP method of a simulated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            HttpMethod::Get => HttpMethod::Post,
            HttpMethod::Post => HttpMethod::Put,
            HttpMethod::Put => HttpMethod::Delete,
            HttpMethod::Delete => HttpMethod::Patch,
            HttpMethod::Patch => HttpMethod::Get,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(format!("Unsupported HTTP method: {s}")),
        }
    }
}

/// A request typed into the console. Headers are kept as the raw text the
/// user edited; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulatedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: String,
    pub body: String,
}

impl Default for SimulatedRequest {
    fn default() -> Self {
        Self {
            method: HttpMethod::Post,
            path: "/webhook".to_string(),
            headers: "{\n  \"Content-Type\": \"application/json\"\n}".to_string(),
            body: String::new(),
        }
    }
}

/// Active tab of the structured request form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestTab {
    #[default]
    Body,
    Headers,
}

impl FromStr for RequestTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" => Ok(RequestTab::Body),
            "headers" => Ok(RequestTab::Headers),
            _ => Err(format!("Unknown request tab: {s}")),
        }
    }
}

/// The subject of an attempt as entered in the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptInput {
    /// Free-text buffer
    Raw(String),
    /// Method/path/headers/body form
    Structured {
        request: SimulatedRequest,
        active_tab: RequestTab,
    },
}

impl AttemptInput {
    /// The text the user considers "the input", used for log snippets
    pub fn primary_text(&self) -> &str {
        match self {
            AttemptInput::Raw(text) => text,
            AttemptInput::Structured { request, .. } => &request.body,
        }
    }
}

/// Outcome of one attempt as presented to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub raw_text: String,
    pub display_text: String,
    pub succeeded: bool,
}
