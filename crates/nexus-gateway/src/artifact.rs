//! Hosted script store.
//!
//! Holds the in-memory "worker" script built from a JS_WORKER response. At
//! most one handle is live: publishing releases the previous handle first,
//! and dropping the store releases whatever is left.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const SCRIPT_MIME_TYPE: &str = "application/javascript";

const URL_PREFIX: &str = "blob:nexus-gateway/";

/// A loadable in-memory script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedScript {
    pub url: String,
    pub mime_type: &'static str,
    pub source: Arc<str>,
    pub created_at: DateTime<Utc>,
}

/// Owner of the single live hosted script
#[derive(Debug, Default)]
pub struct ScriptHost {
    current: Option<HostedScript>,
    created: u64,
    released: u64,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `source` as a script resource, releasing any previous handle
    pub fn publish(&mut self, source: &str) -> &HostedScript {
        self.release();

        let script = HostedScript {
            url: format!("{URL_PREFIX}{}", Uuid::new_v4()),
            mime_type: SCRIPT_MIME_TYPE,
            source: Arc::from(source),
            created_at: Utc::now(),
        };
        debug!(url = %script.url, bytes = source.len(), "Hosted worker script");
        self.created += 1;
        self.current.insert(script)
    }

    /// Release the live handle, if any. Returns whether one was released.
    pub fn release(&mut self) -> bool {
        match self.current.take() {
            Some(script) => {
                debug!(url = %script.url, "Released worker script");
                self.released += 1;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&HostedScript> {
        self.current.as_ref()
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }

    /// Handles created but not yet released (0 or 1)
    pub fn live_count(&self) -> u64 {
        self.created - self.released
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        self.release();
    }
}
