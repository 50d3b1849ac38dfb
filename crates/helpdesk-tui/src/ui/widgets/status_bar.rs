//! Status bar widget.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Styles::default().bg(Palette::ACCENT).fg(Palette::FG),
            ),
            Span::styled(" ", Styles::status_bar()),
        ];

        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(
                format!(" {} ", hint.label),
                Styles::key_label(),
            ));
        }

        let left_line = Line::from(spans);
        buf.set_line(area.x, area.y, &left_line, area.width);

        // Right text wins over hints it overlaps.
        if let Some(text) = self.right_text {
            let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            if text_width < area.width {
                let x = area.x + area.width - text_width - 1;
                buf.set_string(x, area.y, text, Styles::status_bar());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_renders_mode_hints_and_right_text() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("Chat")
            .hints(vec![KeyHint::new("F1", "Help")])
            .right("us-east-1")
            .render(area, &mut buf);

        assert_eq!(
            buffer_to_string(&buf),
            " Chat   F1  Help              us-east-1"
        );
    }

    #[test]
    fn test_right_text_too_wide_is_skipped() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("A").right("far too long").render(area, &mut buf);
        assert!(!buffer_to_string(&buf).contains("long"));
    }
}
