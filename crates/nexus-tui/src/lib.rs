//! Nexus TUI - interactive terminal console for the Nexus Gateway
//!
//! # Features
//!
//! - **Operation modes**: normalization, CORS proxy, debug analysis
//! - **Routing**: optional destination URL and transformation rules
//! - **Input**: raw text buffer or a simulated request (method, path, headers, body)
//! - **Output**: pretty-printed JSON, hosted worker script, clipboard copy
//! - **Transaction log**: most-recent-first, restore an entry into the input
//!
//! # Example
//!
//! ```no_run
//! use nexus_gateway::{Gateway, GatewayConfig, InvocationService};
//! use nexus_tui::App;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::default();
//!     let service = Arc::new(InvocationService::from_config(&config));
//!     let app = App::new(Gateway::new(service), config.model.name.clone());
//!     nexus_tui::run(app).await
//! }
//! ```

pub mod app;
pub mod components;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use event::{Event, EventHandler};
pub use theme::Theme;

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Run the TUI application with the given app state.
///
/// This function handles terminal setup, runs the main event loop,
/// and restores the terminal on exit.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

/// Main event loop. Terminal events and finished remote calls are handled
/// in arrival order so the console keeps drawing while a call is in flight.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut events = EventHandler::new(app.tick_rate);

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => app.handle_key_event(key),
                Some(Event::Paste(text)) => app.handle_paste(&text),
                Some(Event::Tick) => app.on_tick(),
                Some(Event::Resize(_, _)) => {}
                None => break,
            },
            Some(completed) = app.completions.recv() => {
                app.apply_completion(completed);
            }
        }
    }

    Ok(())
}
