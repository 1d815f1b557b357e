//! Right pane: gateway output, hosted worker script and transaction log

use super::truncate;
use crate::app::{App, Focus};
use crate::theme::Theme;
use nexus_gateway::format::looks_like_json;
use nexus_gateway::{AttemptStatus, Outcome};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let has_script = app.gateway.hosted_script().is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if has_script { 4 } else { 0 }),
            Constraint::Min(6),
            Constraint::Length(10),
        ])
        .split(area);

    if has_script {
        draw_hosted_script(frame, app, chunks[0]);
    }
    draw_output(frame, app, chunks[1]);
    draw_log(frame, app, chunks[2]);
}

fn draw_hosted_script(frame: &mut Frame, app: &App, area: Rect) {
    let Some(script) = app.gateway.hosted_script() else {
        return;
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(" URL  ", Style::default().fg(app.theme.muted)),
            Span::styled(script.url.clone(), Style::default().fg(app.theme.success)),
        ]),
        Line::from(vec![
            Span::styled(" Type ", Style::default().fg(app.theme.muted)),
            Span::raw(format!("{} ({} bytes)", script.mime_type, script.source.len())),
        ]),
    ];
    let block = Block::default()
        .title(" Hosted Worker [^W copy] ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.success));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_output(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.gateway.status();
    let border = match status {
        AttemptStatus::Error => app.theme.error,
        AttemptStatus::Success => app.theme.success,
        _ => app.theme.border,
    };
    let json = app
        .gateway
        .result()
        .is_some_and(|result| result.succeeded && looks_like_json(&result.display_text));
    let block = Block::default()
        .title(format!(" Output ({}) [^Y copy] ", app.format.as_str()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let paragraph = match app.gateway.result() {
        Some(result) => {
            let style = if !result.succeeded {
                LineStyle::Error
            } else if json {
                LineStyle::Json
            } else {
                LineStyle::Plain
            };
            let lines: Vec<Line> = result
                .display_text
                .lines()
                .map(|line| highlight_line(line, style, &app.theme))
                .collect();
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((app.output_scroll, 0))
        }
        None if status == AttemptStatus::Processing => Paragraph::new(Span::styled(
            " Waiting for Nexus Core...",
            Style::default().fg(app.theme.warning),
        )),
        None => Paragraph::new(Span::styled(
            " Ready. Press Ctrl+R or F5 to execute.",
            Style::default().fg(app.theme.muted),
        )),
    };
    frame.render_widget(paragraph.block(block), area);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStyle {
    Json,
    Plain,
    Error,
}

/// Color `"key":` prefixes of pretty JSON; error output is tinted as a whole
fn highlight_line(line: &str, style: LineStyle, theme: &Theme) -> Line<'static> {
    match style {
        LineStyle::Error => {
            return Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(theme.error),
            ))
        }
        LineStyle::Plain => return Line::from(line.to_string()),
        LineStyle::Json => {}
    }
    let trimmed = line.trim_start();
    if trimmed.starts_with('"') {
        if let Some(end) = trimmed.find("\":") {
            let indent = line.len() - trimmed.len();
            let split = indent + end + 2;
            return Line::from(vec![
                Span::styled(
                    line[..split].to_string(),
                    Style::default().fg(theme.json_key),
                ),
                Span::raw(line[split..].to_string()),
            ]);
        }
    }
    Line::from(line.to_string())
}

fn draw_log(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Log;
    let snippet_width = area.width.saturating_sub(40) as usize;

    let items: Vec<ListItem> = app
        .gateway
        .log()
        .entries()
        .map(|entry| {
            let (mark, color) = match entry.outcome {
                Outcome::Success => ("✓", app.theme.success),
                Outcome::Error => ("✗", app.theme.error),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(color)),
                Span::styled(
                    entry.timestamp.format("%H:%M:%S").to_string(),
                    Style::default().fg(app.theme.muted),
                ),
                Span::styled(" │ ", Style::default().fg(app.theme.border)),
                Span::styled(
                    format!("{:<10}", entry.mode.label()),
                    Style::default().fg(app.theme.accent),
                ),
                Span::styled(
                    format!("{:<9}", entry.format.label()),
                    Style::default().fg(app.theme.muted),
                ),
                Span::raw(truncate(
                    &entry.input_snippet.replace('\n', " "),
                    snippet_width.max(8),
                )),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(format!(" Transaction Log ({}) ", app.gateway.log().len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            app.theme.focus
        } else {
            app.theme.border
        }));

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " No transactions yet.",
            Style::default().fg(app.theme.muted),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let highlight = if focused {
        Style::default()
            .bg(app.theme.highlight_bg)
            .fg(app.theme.highlight_fg)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    frame.render_stateful_widget(list, area, &mut app.log_state.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_splits_json_key() {
        let theme = Theme::default();
        let line = highlight_line("  \"user_id\": 992,", LineStyle::Json, &theme);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "  \"user_id\":");
        assert_eq!(line.spans[1].content, " 992,");
    }

    #[test]
    fn test_highlight_leaves_plain_text() {
        let theme = Theme::default();
        let line = highlight_line("curl -X POST https://x", LineStyle::Json, &theme);
        assert_eq!(line.spans.len(), 1);
        let line = highlight_line("  \"error\": \"INTERNAL\"", LineStyle::Error, &theme);
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn test_script_output_is_not_key_highlighted() {
        let theme = Theme::default();
        // A worker script line that happens to look like a JSON member
        let line = highlight_line("  \"Content-Type\": \"text/plain\",", LineStyle::Plain, &theme);
        assert_eq!(line.spans.len(), 1);
    }
}
