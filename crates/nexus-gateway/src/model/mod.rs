//! Model invocation service.
//!
//! The only place the gateway performs external I/O. One remote call per
//! attempt: no retry, no backoff, no timeout and no response caching.

mod gemini;

pub use gemini::GeminiBackend;

use crate::config::{GatewayConfig, ModelConfig};
use crate::error::{GatewayError, TransportError};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Parameters of a single generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub subject: &'a str,
    pub instruction: &'a str,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// A remote text-generation endpoint
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run one generation. `Ok(None)` means the call succeeded but produced
    /// no text.
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, TransportError>;
}

/// Where the API key comes from
pub trait CredentialSource: Send + Sync {
    fn lookup(&self) -> Option<String>;

    /// Human-readable description used in configuration errors
    fn describe(&self) -> String;
}

/// Reads the key from the first non-empty environment variable
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    vars: Vec<String>,
}

impl EnvCredentials {
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl CredentialSource for EnvCredentials {
    fn lookup(&self) -> Option<String> {
        self.vars
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    fn describe(&self) -> String {
        self.vars.join(" or ")
    }
}

/// A key supplied directly, mostly for embedding and tests
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Option<String>);

impl CredentialSource for StaticCredentials {
    fn lookup(&self) -> Option<String> {
        self.0.clone().filter(|key| !key.trim().is_empty())
    }

    fn describe(&self) -> String {
        "static API key".to_string()
    }
}

/// Sends subject + instruction to the model and returns its raw text.
///
/// Constructed once at startup and shared behind an `Arc`. The first
/// successful credential lookup is kept for the lifetime of the service; a
/// missing credential is looked up again on the next call.
pub struct InvocationService {
    backend: Arc<dyn ModelBackend>,
    credentials: Box<dyn CredentialSource>,
    api_key: OnceCell<String>,
    temperature: f32,
    max_output_tokens: u32,
}

impl InvocationService {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        credentials: Box<dyn CredentialSource>,
        model: &ModelConfig,
    ) -> Self {
        Self {
            backend,
            credentials,
            api_key: OnceCell::new(),
            temperature: model.temperature,
            max_output_tokens: model.max_output_tokens,
        }
    }

    /// Gemini backend with environment credentials
    pub fn from_config(config: &GatewayConfig) -> Self {
        let backend = GeminiBackend::new(&config.model.base_url, &config.model.name);
        Self::new(
            Arc::new(backend),
            Box::new(EnvCredentials::new(config.api_key_env.clone())),
            &config.model,
        )
    }

    fn api_key(&self) -> Result<&str, GatewayError> {
        if let Some(key) = self.api_key.get() {
            return Ok(key);
        }
        match self.credentials.lookup() {
            Some(key) => Ok(self.api_key.get_or_init(|| key)),
            None => Err(GatewayError::Configuration(self.credentials.describe())),
        }
    }

    /// Run one generation.
    ///
    /// The cancellation token is optional; when it fires first the call is
    /// dropped and `Cancelled` is returned.
    pub async fn invoke(
        &self,
        subject: &str,
        instruction: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, GatewayError> {
        let api_key = self.api_key()?;
        let request = GenerationRequest {
            subject,
            instruction,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        debug!(
            subject_len = subject.len(),
            instruction_len = instruction.len(),
            "Invoking model"
        );

        let call = self.backend.generate(api_key, &request);
        let text = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(GatewayError::Cancelled),
                    result = call => result?,
                }
            }
            None => call.await?,
        };

        match text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GatewayError::EmptyResponse),
        }
    }
}
