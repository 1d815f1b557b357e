//! Theme and color scheme for the TUI

use nexus_gateway::AttemptStatus;
use ratatui::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub border: Color,
    pub focus: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub json_key: Color,
    pub key_fg: Color,
}

impl Theme {
    pub fn status_color(&self, status: AttemptStatus) -> Color {
        match status {
            AttemptStatus::Idle => self.muted,
            AttemptStatus::Validating | AttemptStatus::Processing => self.warning,
            AttemptStatus::Success => self.success,
            AttemptStatus::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            highlight_bg: Color::Rgb(0, 95, 135),
            highlight_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            focus: Color::Magenta,
            header_bg: Color::Cyan,
            header_fg: Color::Black,
            json_key: Color::LightCyan,
            key_fg: Color::Magenta,
        }
    }
}
