//! Per-attempt state machine.
//!
//! ```text
//! IDLE -> VALIDATING -> ERROR                       (empty input, no remote call)
//!                    -> PROCESSING -> SUCCESS | ERROR
//! ```
//!
//! [`Gateway::begin`] runs synchronously up to PROCESSING and hands back a
//! [`PendingInvocation`]. The caller awaits it (inline, or on a task so a UI
//! keeps drawing) and feeds the completion to [`Gateway::finish`].

use crate::artifact::{HostedScript, ScriptHost};
use crate::envelope::build_subject;
use crate::error::{render_payload, GatewayError, InternalErrorPayload, ValidationPayload};
use crate::format::format_response;
use crate::log::{LogEntry, Outcome, SessionLog};
use crate::model::InvocationService;
use crate::prompt::{self, Directives};
use crate::types::{AttemptInput, InvocationResult, OperationMode, OutputFormat};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    #[default]
    Idle,
    Validating,
    Processing,
    Success,
    Error,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Idle => "IDLE",
            AttemptStatus::Validating => "VALIDATING",
            AttemptStatus::Processing => "PROCESSING",
            AttemptStatus::Success => "SUCCESS",
            AttemptStatus::Error => "ERROR",
        }
    }
}

/// Everything the user chose for one attempt
#[derive(Debug, Clone)]
pub struct AttemptRequest {
    pub mode: OperationMode,
    pub format: OutputFormat,
    pub destination: Option<String>,
    pub rules: Option<String>,
    pub input: AttemptInput,
}

impl AttemptRequest {
    pub fn raw(mode: OperationMode, format: OutputFormat, input: impl Into<String>) -> Self {
        Self {
            mode,
            format,
            destination: None,
            rules: None,
            input: AttemptInput::Raw(input.into()),
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }
}

/// Result of triggering an attempt
pub enum Trigger {
    /// Validation passed; the remote call is ready to run
    Started(PendingInvocation),
    /// Validation refused the input; the error payload is the current result
    Refused,
    /// Another attempt is still processing
    Busy,
}

/// A validated attempt waiting for its remote call
pub struct PendingInvocation {
    id: u64,
    subject: String,
    instruction: String,
    service: Arc<InvocationService>,
    cancel: Option<CancellationToken>,
}

impl PendingInvocation {
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Perform the remote call
    pub async fn run(self) -> CompletedInvocation {
        let outcome = self
            .service
            .invoke(&self.subject, &self.instruction, self.cancel.as_ref())
            .await;
        CompletedInvocation {
            id: self.id,
            outcome,
        }
    }
}

/// Outcome of a remote call, to be applied with [`Gateway::finish`]
#[derive(Debug)]
pub struct CompletedInvocation {
    id: u64,
    outcome: Result<String, GatewayError>,
}

struct InFlight {
    id: u64,
    mode: OperationMode,
    format: OutputFormat,
    input: String,
}

/// Console-facing orchestrator owning the current result, the hosted script
/// and the session log.
pub struct Gateway {
    service: Arc<InvocationService>,
    status: AttemptStatus,
    result: Option<InvocationResult>,
    scripts: ScriptHost,
    log: SessionLog,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl Gateway {
    pub fn new(service: Arc<InvocationService>) -> Self {
        Self {
            service,
            status: AttemptStatus::Idle,
            result: None,
            scripts: ScriptHost::new(),
            log: SessionLog::new(),
            in_flight: None,
            next_id: 0,
        }
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn is_processing(&self) -> bool {
        self.status == AttemptStatus::Processing
    }

    pub fn result(&self) -> Option<&InvocationResult> {
        self.result.as_ref()
    }

    pub fn hosted_script(&self) -> Option<&HostedScript> {
        self.scripts.current()
    }

    pub fn scripts(&self) -> &ScriptHost {
        &self.scripts
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Validate the request and move to PROCESSING.
    ///
    /// The previous result and hosted script are cleared before anything
    /// else, so at most one result is ever current.
    pub fn begin(&mut self, request: &AttemptRequest) -> Trigger {
        if self.is_processing() {
            debug!("Ignoring trigger while an attempt is processing");
            return Trigger::Busy;
        }

        self.status = AttemptStatus::Validating;
        self.result = None;
        self.scripts.release();

        let now = Utc::now();
        let subject = match build_subject(&request.input, now) {
            Ok(subject) => subject,
            Err(err) => {
                warn!(mode = %request.mode, format = %request.format, "Attempt refused: {}", err);
                let text = render_payload(&ValidationPayload::payload_missing(now));
                self.result = Some(InvocationResult {
                    raw_text: text.clone(),
                    display_text: text,
                    succeeded: false,
                });
                self.status = AttemptStatus::Error;
                return Trigger::Refused;
            }
        };

        let instruction = prompt::compose(&Directives {
            mode: request.mode,
            destination: request.destination.as_deref(),
            format: request.format,
            rules: request.rules.as_deref(),
        });

        self.next_id += 1;
        let id = self.next_id;
        self.in_flight = Some(InFlight {
            id,
            mode: request.mode,
            format: request.format,
            input: request.input.primary_text().to_string(),
        });
        self.status = AttemptStatus::Processing;

        info!(
            attempt = id,
            mode = %request.mode,
            format = %request.format,
            routed = request.destination.as_deref().is_some_and(|d| !d.trim().is_empty()),
            "Attempt started"
        );

        Trigger::Started(PendingInvocation {
            id,
            subject,
            instruction,
            service: Arc::clone(&self.service),
            cancel: None,
        })
    }

    /// Apply a completed remote call.
    ///
    /// Returns `false` when the completion belongs to an attempt that was
    /// reset or superseded; it is then ignored.
    pub fn finish(&mut self, completed: CompletedInvocation) -> bool {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.id == completed.id => in_flight,
            other => {
                self.in_flight = other;
                debug!(attempt = completed.id, "Ignoring stale completion");
                return false;
            }
        };

        match completed.outcome {
            Ok(raw) => {
                let display_text = format_response(&raw, in_flight.format);
                if in_flight.format.is_hostable() {
                    self.scripts.publish(&raw);
                }
                self.result = Some(InvocationResult {
                    raw_text: raw,
                    display_text,
                    succeeded: true,
                });
                self.status = AttemptStatus::Success;
                self.log.record(LogEntry::new(
                    in_flight.mode,
                    in_flight.format,
                    &in_flight.input,
                    Outcome::Success,
                ));
                info!(attempt = in_flight.id, "Attempt succeeded");
            }
            Err(err) => {
                error!(
                    attempt = in_flight.id,
                    kind = err.kind().as_str(),
                    "Gateway error: {}",
                    err
                );
                let text = render_payload(&InternalErrorPayload::from(&err));
                self.result = Some(InvocationResult {
                    raw_text: text.clone(),
                    display_text: text,
                    succeeded: false,
                });
                self.status = AttemptStatus::Error;
                self.log.record(LogEntry::new(
                    in_flight.mode,
                    in_flight.format,
                    &in_flight.input,
                    Outcome::Error,
                ));
            }
        }
        true
    }

    /// Run a whole attempt inline
    pub async fn execute(&mut self, request: &AttemptRequest) -> AttemptStatus {
        if let Trigger::Started(pending) = self.begin(request) {
            let completed = pending.run().await;
            self.finish(completed);
        }
        self.status
    }

    /// Back to IDLE: result and hosted script cleared, log kept. A call still
    /// in flight is abandoned and its completion ignored.
    pub fn reset(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(attempt = in_flight.id, "Abandoning in-flight attempt");
        }
        self.status = AttemptStatus::Idle;
        self.result = None;
        self.scripts.release();
    }

    /// Drop every log entry
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}
