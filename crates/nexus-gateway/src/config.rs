//! Gateway configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or no file) is a valid configuration. Binaries layer command line
//! overrides on top.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Model endpoint settings
    pub model: ModelConfig,
    /// Environment variables consulted, in order, for the API key
    pub api_key_env: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            api_key_env: vec!["API_KEY".to_string(), "GEMINI_API_KEY".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            name: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl GatewayConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: GatewayConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let base_url = self.model.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!(
                "Invalid model.base_url '{}': expected an http:// or https:// URL",
                self.model.base_url
            );
        }

        if self.model.name.trim().is_empty() {
            anyhow::bail!("model.name must not be empty");
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            anyhow::bail!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            );
        }

        if self.model.max_output_tokens == 0 {
            anyhow::bail!("model.max_output_tokens must be greater than zero");
        }

        if self.api_key_env.iter().all(|name| name.trim().is_empty()) {
            anyhow::bail!("api_key_env must name at least one environment variable");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.temperature, 0.1);
        assert_eq!(config.model.max_output_tokens, 2048);
        assert_eq!(config.api_key_env, vec!["API_KEY", "GEMINI_API_KEY"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model:\n  name: gemini-2.5-pro\n").unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.model.name, "gemini-2.5-pro");
        assert_eq!(config.model.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = GatewayConfig::default();
        config.model.base_url = "generativelanguage.googleapis.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_zero_tokens_rejected() {
        let mut config = GatewayConfig::default();
        config.model.max_output_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_key_env_rejected() {
        let config = GatewayConfig {
            api_key_env: vec![" ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
