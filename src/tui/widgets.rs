//! Custom widgets for the game UI

use crate::data::Severity;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// How close a suspect is to an accusation: one cell per clue, out of the
/// evidence threshold.
pub struct EvidenceMeter {
    label: String,
    count: usize,
    threshold: usize,
    color: Color,
    ready_color: Color,
}

impl EvidenceMeter {
    pub fn new(label: &str, count: usize, threshold: usize) -> Self {
        Self {
            label: label.to_string(),
            count,
            threshold: threshold.max(1),
            color: Color::Yellow,
            ready_color: Color::Red,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn ready_color(mut self, color: Color) -> Self {
        self.ready_color = color;
        self
    }
}

impl Widget for EvidenceMeter {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let color = if self.count >= self.threshold {
            self.ready_color
        } else {
            self.color
        };

        // "[##-] name"
        let cells = self.threshold.min(usize::from(area.width - 2));
        let filled = self.count.min(cells);
        let mut bar = String::with_capacity(cells + 2);
        bar.push('[');
        bar.extend(std::iter::repeat('█').take(filled));
        bar.extend(std::iter::repeat('░').take(cells - filled));
        bar.push(']');

        buf.set_stringn(area.x, area.y, &bar, usize::from(area.width), Style::default().fg(color));
        let used = (cells + 3) as u16;
        if used < area.width {
            buf.set_stringn(
                area.x + used,
                area.y,
                &self.label,
                usize::from(area.width - used),
                Style::default().fg(Color::White),
            );
        }
    }
}

/// One-line alert with a severity symbol
pub struct AlertIndicator {
    message: String,
    severity: Severity,
}

impl AlertIndicator {
    pub fn new(message: &str, severity: Severity) -> Self {
        Self {
            message: message.to_string(),
            severity,
        }
    }
}

impl Widget for AlertIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let color = crate::tui::severity_color(&self.severity);
        let text = format!("{} {}", self.severity.symbol(), self.message);
        buf.set_stringn(area.x, area.y, &text, usize::from(area.width), Style::default().fg(color));
    }
}

/// Double-bordered box for accusations and verdicts
pub struct DramaticBox {
    title: String,
    content: Vec<String>,
    border_color: Color,
}

impl DramaticBox {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            border_color: Color::Red,
        }
    }

    pub fn content(mut self, lines: Vec<String>) -> Self {
        self.content = lines;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }
}

impl Widget for DramaticBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let style = Style::default().fg(self.border_color);
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(area.x, bottom, "╚", style);
        buf.set_string(right, bottom, "╝", style);
        for x in area.x + 1..right {
            buf.set_string(x, area.y, "═", style);
            buf.set_string(x, bottom, "═", style);
        }
        for y in area.y + 1..bottom {
            buf.set_string(area.x, y, "║", style);
            buf.set_string(right, y, "║", style);
        }

        let title = format!(" {} ", self.title);
        let title_width = title.chars().count() as u16;
        if title_width + 2 <= area.width {
            let start = area.x + (area.width - title_width) / 2;
            buf.set_string(start, area.y, &title, style);
        }

        let inner_width = usize::from(area.width.saturating_sub(4));
        for (i, line) in self.content.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= bottom {
                break;
            }
            buf.set_stringn(area.x + 2, y, line, inner_width, Style::default().fg(Color::White));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn meter_fills_one_cell_per_clue() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        EvidenceMeter::new("Butcher", 1, 2).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("[█░] Butcher"));
    }

    #[test]
    fn meter_caps_at_threshold() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        EvidenceMeter::new("Freud", 5, 2).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("[██] Freud"));
    }

    #[test]
    fn dramatic_box_survives_tiny_areas() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        DramaticBox::new("ACCUSATION").render(area, &mut buf);

        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        DramaticBox::new("ACCUSATION")
            .content(vec!["Accuse Julius?".to_string(), "clipped".to_string()])
            .render(area, &mut buf);
        assert!(row(&buf, 0).contains("ACCUSATION"));
        assert!(row(&buf, 1).contains("Accuse Julius?"));
        assert!(row(&buf, 3).starts_with('╚'));
    }
}
