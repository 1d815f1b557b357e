//! In-memory session log of attempts, most recent first.

use crate::types::{OperationMode, OutputFormat};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

/// Characters of input kept in a log snippet
pub const SNIPPET_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: OperationMode,
    pub format: OutputFormat,
    pub input_snippet: String,
    pub outcome: Outcome,
}

impl LogEntry {
    pub fn new(
        mode: OperationMode,
        format: OutputFormat,
        input: &str,
        outcome: Outcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            mode,
            format,
            input_snippet: snippet(input),
            outcome,
        }
    }
}

/// First [`SNIPPET_CHARS`] characters, with `...` when truncated
pub fn snippet(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Append-only record of past attempts. Never persisted.
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: VecDeque<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncation() {
        assert_eq!(snippet("short"), "short");

        let exact = "a".repeat(SNIPPET_CHARS);
        assert_eq!(snippet(&exact), exact);

        let long = "User John Doe (ID: 992) signed up at 12:00 PM via Landing Page B.";
        assert_eq!(snippet(long), "User John Doe (ID: 992) signed up at 12:...");
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let input = "é".repeat(SNIPPET_CHARS + 1);
        let expected = format!("{}...", "é".repeat(SNIPPET_CHARS));
        assert_eq!(snippet(&input), expected);
    }

    #[test]
    fn test_most_recent_first() {
        let mut log = SessionLog::new();
        for i in 0..3 {
            log.record(LogEntry::new(
                OperationMode::Normalization,
                OutputFormat::Json,
                &format!("attempt {i}"),
                Outcome::Success,
            ));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().unwrap().input_snippet, "attempt 2");
        let order: Vec<_> = log.entries().map(|e| e.input_snippet.as_str()).collect();
        assert_eq!(order, ["attempt 2", "attempt 1", "attempt 0"]);
    }

    #[test]
    fn test_no_dedup_and_clear() {
        let mut log = SessionLog::new();
        let entry = LogEntry::new(
            OperationMode::DebugAnalysis,
            OutputFormat::Curl,
            "same",
            Outcome::Error,
        );
        let id = entry.id;
        log.record(entry.clone());
        log.record(entry);
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).map(|e| e.id), Some(id));
        assert_eq!(log.get(1).map(|e| e.id), Some(id));

        log.clear();
        assert!(log.is_empty());
        assert!(log.get(0).is_none());
    }
}
