//! Terminal User Interface
//!
//! The mansion investigation rendered with ratatui

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::Severity;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the game
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
            header: Color::Magenta,
        }
    }
}

/// Get color for severity level
pub fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Info => Color::Gray,
        Severity::Notice => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Smaller logo for header
pub const SMALL_LOGO: &str = " DETECTIVE QUEST ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════════╗
║                    CONTROLS                       ║
╠═══════════════════════════════════════════════════╣
║  e     Go to the room on the left                 ║
║  d     Go to the room on the right                ║
║  s     Stop investigating and show the summary    ║
║  ?     Toggle this help                           ║
║  Esc   Close this help                            ║
╠═══════════════════════════════════════════════════╣
║                  WHEN ASKED                       ║
╠═══════════════════════════════════════════════════╣
║  s     Yes: accuse / play again                   ║
║  n     No: keep looking / leave                   ║
╠═══════════════════════════════════════════════════╣
║  Past a dead end you walk back to the entrance.   ║
║  Two clues against one suspect open an accusation.║
╚═══════════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the game content layout (left panel + main area)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Side panel
            Constraint::Percentage(70), // Main area
        ])
        .split(area)
        .to_vec()
}

/// Create the main area layout (messages + clue notebook)
pub fn create_main_area_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Messages
            Constraint::Percentage(40), // Notebook
        ])
        .split(area)
        .to_vec()
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect(70, 25, area);
        assert_eq!(popup, area);

        let popup = centered_rect(10, 4, area);
        assert_eq!(popup, Rect::new(5, 3, 10, 4));
    }
}
