//! Nexus Gateway core library.
//!
//! Collects a simulated HTTP request (or raw payload) and an output format,
//! forwards them with a fixed persona prompt to a hosted language model and
//! formats whatever text comes back.
//!
//! # Components
//!
//! - **Envelope** ([`envelope`]): input → subject text
//! - **Prompt** ([`prompt`]): persona + directives → instruction
//! - **Model** ([`model`]): the single remote call
//! - **Format** ([`format`]): best-effort JSON pretty-printing
//! - **Hosted scripts** ([`artifact`]): at most one in-memory worker script
//! - **Session log** ([`log`]): most-recent-first attempt history
//! - **Attempt** ([`attempt`]): the state machine tying them together
//!
//! # Example
//!
//! ```no_run
//! use nexus_gateway::{AttemptRequest, Gateway, GatewayConfig, InvocationService};
//! use nexus_gateway::{OperationMode, OutputFormat};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = Arc::new(InvocationService::from_config(&GatewayConfig::default()));
//!     let mut gateway = Gateway::new(service);
//!
//!     let request = AttemptRequest::raw(
//!         OperationMode::Normalization,
//!         OutputFormat::Json,
//!         "User John Doe (ID: 992) signed up at 12:00 PM via Landing Page B.",
//!     );
//!     gateway.execute(&request).await;
//!
//!     if let Some(result) = gateway.result() {
//!         println!("{}", result.display_text);
//!     }
//! }
//! ```

pub mod artifact;
pub mod attempt;
pub mod config;
pub mod envelope;
pub mod error;
pub mod format;
pub mod log;
pub mod model;
pub mod prompt;
pub mod templates;
pub mod types;

pub use artifact::{HostedScript, ScriptHost};
pub use attempt::{
    AttemptRequest, AttemptStatus, CompletedInvocation, Gateway, PendingInvocation, Trigger,
};
pub use config::GatewayConfig;
pub use error::{ErrorKind, GatewayError, TransportError};
pub use log::{LogEntry, Outcome, SessionLog};
pub use model::{
    CredentialSource, EnvCredentials, GeminiBackend, GenerationRequest, InvocationService,
    ModelBackend, StaticCredentials,
};
pub use types::{
    AttemptInput, HttpMethod, InvocationResult, OperationMode, OutputFormat, RequestTab,
    SimulatedRequest,
};
