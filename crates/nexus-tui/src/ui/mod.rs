//! UI rendering for the TUI

mod console;
mod help;
mod output;

use crate::app::{App, Focus, Overlay, StatusLevel};
use crate::components::TextInput;
use nexus_gateway::AttemptStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Console and output
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    console::draw(frame, app, panes[0]);
    output::draw(frame, app, panes[1]);

    draw_status_bar(frame, app, chunks[2]);

    if app.overlay == Overlay::Help {
        help::draw_overlay(frame, app.help_scroll);
    }
}

/// Draw the header bar
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.gateway.status();
    let badge = if status == AttemptStatus::Processing {
        format!(
            " {} {} ",
            SPINNER[app.spinner_frame % SPINNER.len()],
            status.as_str()
        )
    } else {
        format!(" ● {} ", status.as_str())
    };

    let title = Line::from(vec![
        Span::styled(
            " NEXUS GATEWAY ",
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            badge,
            Style::default()
                .fg(app.theme.status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(&app.model_label, Style::default().fg(app.theme.muted)),
        Span::styled(
            format!("  Transactions: {}", app.gateway.log().len()),
            Style::default().fg(app.theme.muted),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(title).block(block), area);
}

/// Draw the status bar: the last message, or the key hints
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let line = if let Some((msg, level, _)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => app.theme.fg,
            StatusLevel::Success => app.theme.success,
            StatusLevel::Warning => app.theme.warning,
            StatusLevel::Error => app.theme.error,
        };
        Line::from(Span::styled(format!(" {}", msg), Style::default().fg(color)))
    } else {
        build_command_line(&commands(app.focus), app)
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Command definition (key, label)
type Command = (&'static str, &'static str);

fn commands(focus: Focus) -> Vec<Command> {
    let mut cmds = vec![("^R/F5", "Execute"), ("Tab", "Focus")];
    if focus == Focus::Log {
        cmds.push(("Enter", "Restore"));
    }
    cmds.extend([
        ("F2", "Mode"),
        ("F3", "Format"),
        ("F6", "Raw/Req"),
        ("^L", "Template"),
        ("^X", "Reset"),
        ("^Y", "Copy"),
        ("F1", "Help"),
        ("^Q", "Quit"),
    ]);
    cmds
}

/// Build a command line with [key] notation and separators
fn build_command_line(commands: &[Command], app: &App) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, label)) in commands.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(app.theme.border)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(app.theme.key_fg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", label),
            Style::default().fg(app.theme.muted),
        ));
    }
    Line::from(spans)
}

/// Bordered block whose border lights up when focused
pub(crate) fn field_block<'a>(title: impl Into<Line<'a>>, focused: bool, app: &App) -> Block<'a> {
    let color = if focused {
        app.theme.focus
    } else {
        app.theme.border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// Render a text input inside `block`, showing `placeholder` when empty and
/// placing the terminal cursor when focused.
pub(crate) fn draw_text_input(
    frame: &mut Frame,
    app: &App,
    input: &TextInput,
    block: Block,
    placeholder: &str,
    focused: bool,
    area: Rect,
) {
    let inner = block.inner(area);
    let cursor = input.cursor();

    // Keep the cursor row/column visible
    let row_offset = cursor.row.saturating_sub(inner.height.saturating_sub(1) as usize);
    let col_offset = cursor.col.saturating_sub(inner.width.saturating_sub(1) as usize);

    let paragraph = if input.is_blank() && !focused {
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(app.theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        let lines: Vec<Line> = input
            .lines()
            .iter()
            .map(|l| Line::from(l.chars().skip(col_offset).collect::<String>()))
            .collect();
        Paragraph::new(lines).scroll((row_offset as u16, 0))
    };
    frame.render_widget(paragraph.block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x + (cursor.col - col_offset) as u16;
        let y = inner.y + (cursor.row - row_offset) as u16;
        frame.set_cursor_position(Position { x, y });
    }
}

/// Upper bound for the help overlay scroll offset
pub fn help_line_count() -> u16 {
    help::line_count()
}

/// Calculate a centered rect for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to `max` characters with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
