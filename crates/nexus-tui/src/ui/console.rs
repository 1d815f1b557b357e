//! Left pane: mode, routing and the input buffer

use super::{draw_text_input, field_block};
use crate::app::{App, Focus, InputKind};
use nexus_gateway::templates;
use nexus_gateway::{OperationMode, OutputFormat, RequestTab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Mode selector
            Constraint::Length(3), // Destination
            Constraint::Length(3), // Rules
            Constraint::Length(3), // Output format
            Constraint::Min(6),    // Input
        ])
        .split(area);

    draw_mode_selector(frame, app, chunks[0]);

    draw_text_input(
        frame,
        app,
        &app.destination,
        field_block(" Destination URL ", app.focus == Focus::Destination, app),
        "Optional: https://hooks.example.com/ingest",
        app.focus == Focus::Destination,
        chunks[1],
    );
    draw_text_input(
        frame,
        app,
        &app.rules,
        field_block(" Transformation Rules ", app.focus == Focus::Rules, app),
        "Optional: rename user_id to uid, drop timestamps...",
        app.focus == Focus::Rules,
        chunks[2],
    );

    draw_format_selector(frame, app, chunks[3]);

    match app.input_kind {
        InputKind::Raw => draw_raw_input(frame, app, chunks[4]),
        InputKind::Structured => draw_request_form(frame, app, chunks[4]),
    }
}

fn selector_line<T: Copy + PartialEq>(
    app: &App,
    options: &[T],
    selected: T,
    label: impl Fn(T) -> &'static str,
) -> Line<'static> {
    let mut spans = Vec::with_capacity(options.len() * 2);
    for option in options {
        let style = if *option == selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        spans.push(Span::styled(format!(" {} ", label(*option)), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn draw_mode_selector(frame: &mut Frame, app: &App, area: Rect) {
    let line = selector_line(app, &OperationMode::ALL, app.mode, |m| m.label());
    let block = Block::default()
        .title(" Operation Mode [F2] ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_format_selector(frame: &mut Frame, app: &App, area: Rect) {
    let line = selector_line(app, &OutputFormat::ALL, app.format, |f| f.label());
    let block = Block::default()
        .title(" Output Format [F3] ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_raw_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Payload;
    draw_text_input(
        frame,
        app,
        &app.raw_input,
        field_block(" Raw Input [F6: request form] ", focused, app),
        templates::input_hint(app.mode),
        focused,
        area,
    );
}

fn draw_request_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let line_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(10)])
        .split(chunks[0]);

    let method = Paragraph::new(Span::styled(
        format!(" {}", app.method),
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .title(" [F4] ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(method, line_chunks[0]);

    draw_text_input(
        frame,
        app,
        &app.path,
        field_block(" Path ", app.focus == Focus::Path, app),
        "/webhook",
        app.focus == Focus::Path,
        line_chunks[1],
    );

    let tab_style = |tab: RequestTab| {
        if app.active_tab == tab {
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(app.theme.muted)
        }
    };
    let title = Line::from(vec![
        Span::raw(" "),
        Span::styled("Body", tab_style(RequestTab::Body)),
        Span::raw(" │ "),
        Span::styled("Headers", tab_style(RequestTab::Headers)),
        Span::styled(" [^T] ", Style::default().fg(app.theme.muted)),
    ]);

    let focused = app.focus == Focus::Payload;
    let placeholder = match app.active_tab {
        RequestTab::Body => templates::input_hint(app.mode),
        RequestTab::Headers => "{ \"Content-Type\": \"application/json\" }",
    };
    draw_text_input(
        frame,
        app,
        app.payload_input(),
        field_block(title, focused, app),
        placeholder,
        focused,
        chunks[1],
    );
}
