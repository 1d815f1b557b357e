//! Nexus TUI - interactive terminal console for the Nexus Gateway
//!
//! # Usage
//!
//! ```bash
//! # Credentials come from API_KEY (or GEMINI_API_KEY)
//! API_KEY=... nexus-tui
//!
//! # Load settings from a YAML file and log to a file
//! nexus-tui --config nexus.yaml --log-file /tmp/nexus-tui.log
//! ```

use anyhow::Context;
use clap::Parser;
use nexus_gateway::{Gateway, GatewayConfig, InvocationService};
use nexus_tui::App;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nexus-tui")]
#[command(author, version, about = "Interactive console for the Nexus Gateway")]
struct Args {
    /// Gateway configuration file (YAML)
    #[arg(short, long, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Model name override
    #[arg(short, long, env = "NEXUS_MODEL")]
    model: Option<String>,

    /// Model API base URL override
    #[arg(long, env = "NEXUS_BASE_URL")]
    base_url: Option<String>,

    /// Write diagnostics to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    log_level: String,

    /// UI tick interval in milliseconds
    #[arg(long, default_value = "120")]
    tick_ms: u64,
}

fn init_logging(path: &PathBuf, level: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path, &args.log_level)?;
    }

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(model) = args.model {
        config.model.name = model;
    }
    if let Some(base_url) = args.base_url {
        config.model.base_url = base_url;
    }
    config.validate()?;

    tracing::info!(model = %config.model.name, "Starting console");

    let service = Arc::new(InvocationService::from_config(&config));
    let mut app = App::new(Gateway::new(service), config.model.name.clone());
    app.tick_rate = std::time::Duration::from_millis(args.tick_ms.max(16));

    nexus_tui::run(app).await
}
