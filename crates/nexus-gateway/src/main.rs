//! Nexus Gateway CLI: run a single attempt from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a raw payload to JSON (reads API_KEY from the environment)
//! nexus "User John Doe (ID: 992) signed up at 12:00 PM via Landing Page B."
//!
//! # Payload from stdin, routed to a webhook as a cURL command
//! cat event.log | nexus --mode normalization --format curl --destination https://hooks.example.com/in
//!
//! # Structured request, worker script saved to disk
//! nexus --format js-worker --method POST --path /signup --body '{"id": 1}' --save-worker worker.js
//! ```

use anyhow::Context;
use clap::Parser;
use nexus_gateway::templates::sample_input;
use nexus_gateway::{
    AttemptInput, AttemptRequest, AttemptStatus, Gateway, GatewayConfig, HttpMethod,
    InvocationService, OperationMode, OutputFormat, RequestTab, SimulatedRequest,
};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(author, version, about = "Route payloads through the Nexus Gateway model")]
struct Args {
    /// Raw input payload (read from stdin when omitted)
    input: Option<String>,

    /// Operation mode: normalization, cors-proxy, debug-analysis
    #[arg(short, long, default_value = "normalization")]
    mode: OperationMode,

    /// Output format: json, js-worker, curl, n8n-workflow
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Destination URL the generated output should route to
    #[arg(short, long)]
    destination: Option<String>,

    /// Free-text transformation rules the model must follow
    #[arg(short, long)]
    rules: Option<String>,

    /// Use the built-in sample input for the selected mode
    #[arg(long, conflicts_with = "input")]
    template: bool,

    /// Simulated request method (switches to structured input)
    #[arg(long)]
    method: Option<HttpMethod>,

    /// Simulated request path
    #[arg(long)]
    path: Option<String>,

    /// Simulated request headers (JSON text, passed through verbatim)
    #[arg(long)]
    headers: Option<String>,

    /// Simulated request body
    #[arg(long)]
    body: Option<String>,

    /// Active tab of the structured form: body or headers
    #[arg(long, default_value = "body")]
    tab: RequestTab,

    /// YAML configuration file
    #[arg(short, long, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Model name override
    #[arg(long, env = "NEXUS_MODEL")]
    model: Option<String>,

    /// Model API base URL override
    #[arg(long, env = "NEXUS_BASE_URL")]
    base_url: Option<String>,

    /// Write the hosted worker script here (js-worker format only)
    #[arg(long)]
    save_worker: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Only the js-worker format produces a hosted script to save
    fn check_save_worker(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.save_worker {
            if !self.format.is_hostable() {
                anyhow::bail!(
                    "--save-worker {} requires --format js-worker (got {})",
                    path.display(),
                    self.format.as_str()
                );
            }
        }
        Ok(())
    }

    fn is_structured(&self) -> bool {
        self.method.is_some() || self.path.is_some() || self.headers.is_some() || self.body.is_some()
    }

    fn load_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GatewayConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.model.base_url = base_url.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn attempt_input(&self) -> anyhow::Result<AttemptInput> {
        if self.is_structured() {
            let defaults = SimulatedRequest::default();
            return Ok(AttemptInput::Structured {
                request: SimulatedRequest {
                    method: self.method.unwrap_or(defaults.method),
                    path: self.path.clone().unwrap_or(defaults.path),
                    headers: self.headers.clone().unwrap_or(defaults.headers),
                    body: self.body.clone().unwrap_or_default(),
                },
                active_tab: self.tab,
            });
        }

        if self.template {
            return Ok(AttemptInput::Raw(sample_input(self.mode).to_string()));
        }

        match &self.input {
            Some(input) => Ok(AttemptInput::Raw(input.clone())),
            None if !std::io::stdin().is_terminal() => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read input from stdin")?;
                Ok(AttemptInput::Raw(buffer))
            }
            None => Ok(AttemptInput::Raw(String::new())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    args.check_save_worker()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str())),
        )
        .init();

    let config = args.load_config()?;
    let service = Arc::new(InvocationService::from_config(&config));
    let mut gateway = Gateway::new(service);

    let request = AttemptRequest {
        mode: args.mode,
        format: args.format,
        destination: args.destination.clone(),
        rules: args.rules.clone(),
        input: args.attempt_input()?,
    };

    let status = gateway.execute(&request).await;

    if let Some(result) = gateway.result() {
        println!("{}", result.display_text);
    }

    if let (Some(path), Some(script)) = (&args.save_worker, gateway.hosted_script()) {
        std::fs::write(path, script.source.as_bytes())
            .with_context(|| format!("Failed to write worker script to {}", path.display()))?;
        eprintln!("Worker script ({}) saved to {}", script.mime_type, path.display());
    }

    Ok(match status {
        AttemptStatus::Success => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
