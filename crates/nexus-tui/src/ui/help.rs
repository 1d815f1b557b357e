//! Help overlay with scroll support

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Draw the help overlay with scrolling
pub fn draw_overlay(frame: &mut Frame, scroll: u16) {
    let area = super::centered_rect(70, 80, frame.area());

    frame.render_widget(Clear, area);

    let help_text = build_help_text();
    let total_lines = help_text.len() as u16;
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = total_lines.saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let block = Block::default()
        .title(" Nexus Gateway Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL);

    let paragraph = Paragraph::new(help_text).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(scroll as usize);

        let scrollbar_area = ratatui::layout::Rect {
            x: area.x + area.width - 1,
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

/// Number of lines in the help text
pub fn line_count() -> u16 {
    build_help_text().len() as u16
}

fn build_help_text() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        section_header("ATTEMPT"),
        Line::from(""),
        help_line("Ctrl+Enter", "Execute (also Ctrl+R, F5)"),
        help_line("Ctrl+X", "Reset output and hosted worker"),
        help_line("Ctrl+L", "Load the sample input for the current mode"),
        Line::from(""),
        section_header("SETTINGS"),
        Line::from(""),
        help_line("F2", "Cycle operation mode"),
        help_line("F3", "Cycle output format"),
        help_line("F6", "Switch raw input / request form"),
        help_line("F4", "Cycle HTTP method (request form)"),
        help_line("Ctrl+T", "Switch Body / Headers tab (request form)"),
        Line::from(""),
        section_header("NAVIGATION"),
        Line::from(""),
        help_line("Tab / Shift+Tab", "Move focus between fields and the log"),
        help_line("Esc", "Focus the input buffer"),
        help_line("PgUp / PgDn", "Scroll output"),
        Line::from(""),
        section_header("TRANSACTION LOG"),
        Line::from(""),
        help_line("↑ / ↓", "Select entry"),
        help_line("Enter", "Restore entry into the input"),
        help_line("Ctrl+K", "Clear the log"),
        Line::from(""),
        section_header("CLIPBOARD"),
        Line::from(""),
        help_line("Ctrl+Y", "Copy output"),
        help_line("Ctrl+W", "Copy hosted worker script"),
        Line::from(""),
        help_line("F1", "Toggle this help"),
        help_line("Ctrl+Q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  [↑/↓] scroll  [PgUp/PgDn] page  [Esc/F1] close",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ]
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<18}", key),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(desc),
    ])
}
