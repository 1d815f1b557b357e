//! Event handling for the TUI

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    /// Tick for spinners and status expiry
    Tick,
    /// Terminal resize
    Resize(u16, u16),
}

/// Handles terminal events and produces Event stream
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tx_clone.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(Duration::from_millis(30)) => {
                        if !event::poll(Duration::from_millis(0)).unwrap_or(false) {
                            continue;
                        }
                        let Ok(evt) = event::read() else {
                            continue;
                        };
                        let event = match evt {
                            // Windows reports both press and release
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Check for control key combination
pub fn ctrl_key(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
}

/// Ctrl+Enter, Ctrl+R or F5
pub fn is_execute_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::F(5) => true,
        KeyCode::Enter => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => ctrl_key(key, 'r'),
    }
}
