//! Application state and key handling

use crate::components::TextInput;
use crate::event::{ctrl_key, is_execute_key};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use nexus_gateway::templates;
use nexus_gateway::{
    AttemptInput, AttemptRequest, AttemptStatus, CompletedInvocation, Gateway, HttpMethod,
    OperationMode, OutputFormat, RequestTab, SimulatedRequest, Trigger,
};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

/// Status messages disappear after this long
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Current overlay (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Status message level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Which field receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Payload,
    Path,
    Destination,
    Rules,
    Log,
}

/// Raw text buffer or the method/path/headers/body form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Raw,
    Structured,
}

/// Main application state
pub struct App {
    pub gateway: Gateway,
    pub model_label: String,

    // Attempt settings
    pub mode: OperationMode,
    pub format: OutputFormat,
    pub input_kind: InputKind,
    pub method: HttpMethod,
    pub active_tab: RequestTab,

    // Editable fields
    pub raw_input: TextInput,
    pub path: TextInput,
    pub headers: TextInput,
    pub body: TextInput,
    pub destination: TextInput,
    pub rules: TextInput,

    // UI State
    pub focus: Focus,
    pub overlay: Overlay,
    pub log_state: ListState,
    pub output_scroll: u16,
    pub help_scroll: u16,
    pub status_message: Option<(String, StatusLevel, Instant)>,
    pub spinner_frame: usize,
    pub theme: Theme,

    // Runtime
    pub should_quit: bool,
    pub tick_rate: Duration,
    completion_tx: mpsc::UnboundedSender<CompletedInvocation>,
    pub(crate) completions: mpsc::UnboundedReceiver<CompletedInvocation>,
}

impl App {
    pub fn new(gateway: Gateway, model_label: impl Into<String>) -> Self {
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let request = SimulatedRequest::default();

        let mut path = TextInput::single_line();
        path.set_content(&request.path);
        let mut headers = TextInput::multi_line();
        headers.set_content(&request.headers);

        Self {
            gateway,
            model_label: model_label.into(),

            mode: OperationMode::Normalization,
            format: OutputFormat::Json,
            input_kind: InputKind::Raw,
            method: request.method,
            active_tab: RequestTab::Body,

            raw_input: TextInput::multi_line(),
            path,
            headers,
            body: TextInput::multi_line(),
            destination: TextInput::single_line(),
            rules: TextInput::single_line(),

            focus: Focus::Payload,
            overlay: Overlay::None,
            log_state: ListState::default(),
            output_scroll: 0,
            help_scroll: 0,
            status_message: None,
            spinner_frame: 0,
            theme: Theme::default(),

            should_quit: false,
            tick_rate: Duration::from_millis(120),
            completion_tx,
            completions,
        }
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some((message.into(), level, Instant::now()));
    }

    /// Advance the spinner and drop an expired status message
    pub fn on_tick(&mut self) {
        if self.gateway.is_processing() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if let Some((_, _, time)) = &self.status_message {
            if time.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    /// The text field that currently receives the payload
    pub fn payload_input(&self) -> &TextInput {
        match (self.input_kind, self.active_tab) {
            (InputKind::Raw, _) => &self.raw_input,
            (InputKind::Structured, RequestTab::Body) => &self.body,
            (InputKind::Structured, RequestTab::Headers) => &self.headers,
        }
    }

    fn payload_input_mut(&mut self) -> &mut TextInput {
        match (self.input_kind, self.active_tab) {
            (InputKind::Raw, _) => &mut self.raw_input,
            (InputKind::Structured, RequestTab::Body) => &mut self.body,
            (InputKind::Structured, RequestTab::Headers) => &mut self.headers,
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Payload => Some(self.payload_input_mut()),
            Focus::Path => Some(&mut self.path),
            Focus::Destination => Some(&mut self.destination),
            Focus::Rules => Some(&mut self.rules),
            Focus::Log => None,
        }
    }

    /// Snapshot of the console settings as an attempt request
    pub fn attempt_request(&self) -> AttemptRequest {
        let input = match self.input_kind {
            InputKind::Raw => AttemptInput::Raw(self.raw_input.content()),
            InputKind::Structured => AttemptInput::Structured {
                request: SimulatedRequest {
                    method: self.method,
                    path: self.path.content(),
                    headers: self.headers.content(),
                    body: self.body.content(),
                },
                active_tab: self.active_tab,
            },
        };
        AttemptRequest {
            mode: self.mode,
            format: self.format,
            destination: non_blank(self.destination.content()),
            rules: non_blank(self.rules.content()),
            input,
        }
    }

    /// Trigger an attempt; the remote call runs on its own task
    pub fn execute(&mut self) {
        let request = self.attempt_request();
        match self.gateway.begin(&request) {
            Trigger::Started(pending) => {
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let completed = pending.run().await;
                    // Receiver gone means the app is shutting down
                    let _ = tx.send(completed);
                });
                self.output_scroll = 0;
                self.set_status("Processing...", StatusLevel::Info);
            }
            Trigger::Refused => {
                self.output_scroll = 0;
                self.set_status("Input buffer is empty", StatusLevel::Warning);
            }
            Trigger::Busy => {
                self.set_status("An attempt is already processing", StatusLevel::Warning);
            }
        }
    }

    /// Apply a finished remote call to the gateway
    pub fn apply_completion(&mut self, completed: CompletedInvocation) {
        if !self.gateway.finish(completed) {
            return;
        }
        match self.gateway.status() {
            AttemptStatus::Success => {
                let message = match self.gateway.hosted_script() {
                    Some(script) => format!("Success. Worker hosted at {}", script.url),
                    None => "Success".to_string(),
                };
                self.set_status(message, StatusLevel::Success);
            }
            _ => self.set_status("Gateway error (see output)", StatusLevel::Error),
        }
        if !self.gateway.log().is_empty() {
            self.log_state.select(Some(0));
        }
    }

    pub fn reset(&mut self) {
        self.gateway.reset();
        self.output_scroll = 0;
        self.set_status("Reset", StatusLevel::Info);
    }

    pub fn clear_log(&mut self) {
        self.gateway.clear_log();
        self.log_state.select(None);
        if self.focus == Focus::Log {
            self.focus = Focus::Payload;
        }
        self.set_status("Transaction log cleared", StatusLevel::Info);
    }

    /// Replace the payload with the sample for the current mode
    pub fn load_template(&mut self) {
        let sample = templates::sample_input(self.mode);
        match self.input_kind {
            InputKind::Raw => self.raw_input.set_content(sample),
            InputKind::Structured => {
                self.body.set_content(sample);
                self.active_tab = RequestTab::Body;
            }
        }
        self.focus = Focus::Payload;
        self.set_status(
            format!("Loaded {} template", self.mode.label()),
            StatusLevel::Info,
        );
    }

    /// Put the selected log entry's snippet, mode and format back into the console
    pub fn restore_selected_log_entry(&mut self) {
        let Some(index) = self.log_state.selected() else {
            return;
        };
        let Some(entry) = self.gateway.log().get(index).cloned() else {
            return;
        };

        self.mode = entry.mode;
        self.format = entry.format;
        match self.input_kind {
            InputKind::Raw => self.raw_input.set_content(&entry.input_snippet),
            InputKind::Structured => {
                self.body.set_content(&entry.input_snippet);
                self.active_tab = RequestTab::Body;
            }
        }
        self.focus = Focus::Payload;
        debug!(entry = %entry.id, "Restored log entry");
        self.set_status("Restored from transaction log", StatusLevel::Info);
    }

    pub fn copy_output(&mut self) {
        let Some(text) = self.gateway.result().map(|r| r.display_text.clone()) else {
            self.set_status("Nothing to copy", StatusLevel::Warning);
            return;
        };
        self.copy_to_clipboard(&text);
    }

    pub fn copy_hosted_script(&mut self) {
        let Some(source) = self.gateway.hosted_script().map(|s| s.source.to_string()) else {
            self.set_status("No hosted worker script", StatusLevel::Warning);
            return;
        };
        self.copy_to_clipboard(&source);
    }

    /// Copy content to clipboard
    pub fn copy_to_clipboard(&mut self, content: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(content.to_string()) {
                    self.set_status(format!("Failed to copy: {}", e), StatusLevel::Error);
                } else {
                    self.set_status("Copied to clipboard", StatusLevel::Success);
                }
            }
            Err(e) => {
                self.set_status(
                    format!("Clipboard not available: {}", e),
                    StatusLevel::Error,
                );
            }
        }
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        self.set_status(format!("Mode: {}", self.mode.label()), StatusLevel::Info);
    }

    pub fn cycle_format(&mut self) {
        self.format = self.format.next();
        self.set_status(format!("Format: {}", self.format.label()), StatusLevel::Info);
    }

    pub fn cycle_method(&mut self) {
        if self.input_kind == InputKind::Structured {
            self.method = self.method.next();
        }
    }

    pub fn toggle_input_kind(&mut self) {
        self.input_kind = match self.input_kind {
            InputKind::Raw => InputKind::Structured,
            InputKind::Structured => InputKind::Raw,
        };
        if self.focus == Focus::Path && self.input_kind == InputKind::Raw {
            self.focus = Focus::Payload;
        }
    }

    pub fn toggle_tab(&mut self) {
        if self.input_kind == InputKind::Structured {
            self.active_tab = match self.active_tab {
                RequestTab::Body => RequestTab::Headers,
                RequestTab::Headers => RequestTab::Body,
            };
            self.focus = Focus::Payload;
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Payload];
        if self.input_kind == InputKind::Structured {
            order.push(Focus::Path);
        }
        order.extend([Focus::Destination, Focus::Rules]);
        if !self.gateway.log().is_empty() {
            order.push(Focus::Log);
        }
        order
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        if self.focus == Focus::Log && self.log_state.selected().is_none() {
            self.log_state.select(Some(0));
        }
    }

    fn select_log(&mut self, down: bool) {
        let len = self.gateway.log().len();
        if len == 0 {
            return;
        }
        let current = self.log_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.log_state.select(Some(next));
    }

    /// Bracketed paste goes into the focused field
    pub fn handle_paste(&mut self, text: &str) {
        if self.overlay != Overlay::None {
            return;
        }
        if let Some(input) = self.focused_input_mut() {
            input.insert_str(text);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.overlay == Overlay::Help {
            match key.code {
                KeyCode::Esc | KeyCode::F(1) => {
                    self.overlay = Overlay::None;
                    self.help_scroll = 0;
                }
                KeyCode::Up => self.help_scroll = self.help_scroll.saturating_sub(1),
                KeyCode::Down => {
                    self.help_scroll = (self.help_scroll + 1).min(crate::ui::help_line_count())
                }
                KeyCode::PageUp => self.help_scroll = self.help_scroll.saturating_sub(10),
                KeyCode::PageDown => {
                    self.help_scroll = (self.help_scroll + 10).min(crate::ui::help_line_count())
                }
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return;
        }

        if ctrl_key(&key, 'c') || ctrl_key(&key, 'q') {
            self.should_quit = true;
            return;
        }
        if is_execute_key(&key) {
            self.execute();
            return;
        }

        match key.code {
            KeyCode::F(1) => self.overlay = Overlay::Help,
            KeyCode::F(2) => self.cycle_mode(),
            KeyCode::F(3) => self.cycle_format(),
            KeyCode::F(4) => self.cycle_method(),
            KeyCode::F(6) => self.toggle_input_kind(),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(5),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(5),
            _ if ctrl_key(&key, 'x') => self.reset(),
            _ if ctrl_key(&key, 'l') => self.load_template(),
            _ if ctrl_key(&key, 't') => self.toggle_tab(),
            _ if ctrl_key(&key, 'y') => self.copy_output(),
            _ if ctrl_key(&key, 'w') => self.copy_hosted_script(),
            _ if ctrl_key(&key, 'k') => self.clear_log(),
            KeyCode::Esc => self.focus = Focus::Payload,
            _ if self.focus == Focus::Log => match key.code {
                KeyCode::Up => self.select_log(false),
                KeyCode::Down => self.select_log(true),
                KeyCode::Enter => self.restore_selected_log_entry(),
                _ => {}
            },
            _ => {
                if let Some(input) = self.focused_input_mut() {
                    input.handle_key(key);
                }
            }
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use nexus_gateway::config::ModelConfig;
    use nexus_gateway::{
        GenerationRequest, InvocationService, ModelBackend, Outcome, StaticCredentials,
        TransportError,
    };
    use std::sync::Arc;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl ModelBackend for FixedBackend {
        async fn generate(
            &self,
            _api_key: &str,
            _request: &GenerationRequest<'_>,
        ) -> Result<Option<String>, TransportError> {
            Ok(Some(self.0.to_string()))
        }
    }

    fn app_with(reply: &'static str) -> App {
        let service = InvocationService::new(
            Arc::new(FixedBackend(reply)),
            Box::new(StaticCredentials(Some("key".to_string()))),
            &ModelConfig::default(),
        );
        App::new(Gateway::new(Arc::new(service)), "test-model")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn settle(app: &mut App) {
        let completed = app.completions.recv().await.unwrap();
        app.apply_completion(completed);
    }

    #[tokio::test]
    async fn test_execute_runs_in_background_and_logs() {
        let mut app = app_with(r#"{"event":"signup"}"#);
        type_str(&mut app, "User signed up");
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.gateway.status(), AttemptStatus::Processing);

        settle(&mut app).await;
        assert_eq!(app.gateway.status(), AttemptStatus::Success);
        assert_eq!(
            app.gateway.result().unwrap().display_text,
            "{\n  \"event\": \"signup\"\n}"
        );
        assert_eq!(app.gateway.log().len(), 1);
        assert_eq!(app.log_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_empty_input_is_refused_without_log() {
        let mut app = app_with("{}");
        ctrl(&mut app, 'r');
        assert_eq!(app.gateway.status(), AttemptStatus::Error);
        assert!(app
            .gateway
            .result()
            .unwrap()
            .display_text
            .contains("PAYLOAD_MISSING"));
        assert!(app.gateway.log().is_empty());
        assert!(matches!(
            app.status_message,
            Some((_, StatusLevel::Warning, _))
        ));
    }

    #[tokio::test]
    async fn test_second_trigger_while_processing_is_busy() {
        let mut app = app_with("ok");
        app.raw_input.set_content("payload");
        app.execute();
        app.execute();
        assert_eq!(app.status_message.as_ref().unwrap().0, "An attempt is already processing");
        settle(&mut app).await;
        assert_eq!(app.gateway.log().len(), 1);
    }

    #[tokio::test]
    async fn test_worker_format_hosts_script() {
        let mut app = app_with("self.onmessage = () => {};");
        app.format = OutputFormat::JsWorker;
        app.raw_input.set_content("Fix CORS for api.example.com");
        app.execute();
        settle(&mut app).await;

        let script = app.gateway.hosted_script().unwrap();
        assert!(script.url.starts_with("blob:"));
        assert!(app.status_message.as_ref().unwrap().0.contains(&script.url));
    }

    #[tokio::test]
    async fn test_reset_drops_pending_completion() {
        let mut app = app_with("late");
        app.raw_input.set_content("payload");
        app.execute();
        ctrl(&mut app, 'x');
        assert_eq!(app.gateway.status(), AttemptStatus::Idle);

        settle(&mut app).await;
        assert_eq!(app.gateway.status(), AttemptStatus::Idle);
        assert!(app.gateway.result().is_none());
        assert!(app.gateway.log().is_empty());
    }

    #[tokio::test]
    async fn test_structured_request_uses_form_fields() {
        let mut app = app_with("{}");
        press(&mut app, KeyCode::F(6));
        press(&mut app, KeyCode::F(4));
        type_str(&mut app, "{\"a\":1}");

        let request = app.attempt_request();
        match request.input {
            AttemptInput::Structured {
                request,
                active_tab,
            } => {
                assert_eq!(request.method, HttpMethod::Post.next());
                assert_eq!(request.path, "/webhook");
                assert_eq!(request.body, "{\"a\":1}");
                assert_eq!(active_tab, RequestTab::Body);
            }
            other => panic!("expected structured input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_routing_fields_are_trimmed_or_omitted() {
        let mut app = app_with("{}");
        app.destination.set_content("  https://hooks.example.com/in  ");
        app.rules.set_content("   ");
        let request = app.attempt_request();
        assert_eq!(
            request.destination.as_deref(),
            Some("https://hooks.example.com/in")
        );
        assert!(request.rules.is_none());
    }

    #[tokio::test]
    async fn test_template_follows_mode() {
        let mut app = app_with("{}");
        press(&mut app, KeyCode::F(2));
        ctrl(&mut app, 'l');
        assert_eq!(
            app.raw_input.content(),
            templates::sample_input(OperationMode::Normalization.next())
        );
    }

    #[tokio::test]
    async fn test_restore_from_log() {
        let mut app = app_with("{}");
        app.format = OutputFormat::Curl;
        app.raw_input.set_content("Error: 500 Internal Server Error while calling billing");
        app.execute();
        settle(&mut app).await;
        assert_eq!(app.gateway.log().latest().unwrap().outcome, Outcome::Success);

        app.raw_input.clear();
        app.format = OutputFormat::Json;
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Log);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.format, OutputFormat::Curl);
        assert_eq!(
            app.raw_input.content(),
            "Error: 500 Internal Server Error while c..."
        );
        assert_eq!(app.focus, Focus::Payload);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let mut app = app_with("{}");
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.overlay, Overlay::Help);
        type_str(&mut app, "abc");
        assert!(app.raw_input.is_blank());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }
}
