//! Message list widget.
//!
//! Each message renders as a sender/timestamp line followed by its wrapped
//! text. The user's messages are right-aligned; support messages sit on the
//! left. Lines are wrapped up front so the widget knows its exact height and
//! can pin the view to the newest entry.

use crate::ui::theme::Styles;
use helpdesk_engine::ChatMessage;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Narrowest column messages are wrapped to.
const MIN_WRAP_WIDTH: usize = 10;

/// Scrollable list of chat messages.
pub struct MessageList<'a> {
    messages: &'a [ChatMessage],
    /// Lines scrolled up from the bottom (0 = newest visible).
    scroll_from_bottom: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            scroll_from_bottom: 0,
        }
    }

    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }
}

/// Column width used for message bodies in a pane `width` cells wide.
pub fn wrap_width(width: usize) -> usize {
    (width * 3 / 4).max(MIN_WRAP_WIDTH).min(width)
}

/// Lay out all messages as display lines for a pane `width` cells wide.
pub fn message_lines(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
    let body_width = wrap_width(width);
    let mut lines = Vec::new();

    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }

        let (alignment, text_style) = if msg.is_user() {
            (Alignment::Right, Styles::user_message())
        } else {
            (Alignment::Left, Styles::support_message())
        };

        lines.push(
            Line::from(vec![
                Span::styled(msg.sender().to_string(), Styles::sender()),
                Span::styled("  ", Styles::default()),
                Span::styled(msg.timestamp().to_string(), Styles::dim()),
            ])
            .alignment(alignment),
        );

        for paragraph in msg.text().split('\n') {
            if body_width == 0 || paragraph.is_empty() {
                lines.push(Line::from("").alignment(alignment));
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, body_width) {
                lines.push(
                    Line::from(Span::styled(wrapped.into_owned(), text_style))
                        .alignment(alignment),
                );
            }
        }
    }

    lines
}

/// Largest useful `scroll_from_bottom` for a pane of the given size.
pub fn max_scroll(messages: &[ChatMessage], width: usize, height: usize) -> usize {
    message_lines(messages, width).len().saturating_sub(height)
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = message_lines(self.messages, usize::from(area.width));
        let height = usize::from(area.height);
        let bottom_start = lines.len().saturating_sub(height);
        let start = bottom_start.saturating_sub(self.scroll_from_bottom);

        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn support(text: &str) -> ChatMessage {
        ChatMessage::new("IT Support", text, "9:00 AM", false)
    }

    fn user(text: &str) -> ChatMessage {
        ChatMessage::new("jdoe", text, "9:01 AM", true)
    }

    fn render(messages: &[ChatMessage], width: u16, height: u16, scroll: usize) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        MessageList::new(messages)
            .scroll_from_bottom(scroll)
            .render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_wrap_width() {
        assert_eq!(wrap_width(40), 30);
        assert_eq!(wrap_width(12), 10);
        assert_eq!(wrap_width(6), 6);
    }

    #[test]
    fn test_line_layout() {
        let messages = [support("hello there"), user("hi")];
        let lines = message_lines(&messages, 40);
        // header, body, blank, header, body
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        assert_eq!(lines[4].alignment, Some(Alignment::Right));
    }

    #[test]
    fn test_wraps_long_text() {
        let messages = [support("one two three four five six seven")];
        // Wrap width for 20 columns is 15.
        let lines = message_lines(&messages, 20);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_alignment() {
        let messages = [support("hello"), user("hi")];
        let screen = render(&messages, 30, 5, 0);
        let rows: Vec<&str> = screen.lines().collect();
        assert_eq!(rows[0], "IT Support  9:00 AM");
        assert_eq!(rows[1], "hello");
        assert_eq!(rows[3], format!("{}jdoe  9:01 AM", " ".repeat(17)));
        assert_eq!(rows[4], format!("{}hi", " ".repeat(28)));
    }

    #[test]
    fn test_pinned_to_bottom() {
        let messages: Vec<ChatMessage> = (0..10).map(|i| support(&format!("m{i}"))).collect();
        let screen = render(&messages, 30, 2, 0);
        assert!(screen.contains("m9"));
        assert!(!screen.contains("m0"));
    }

    #[test]
    fn test_scrolled_up_shows_older() {
        let messages: Vec<ChatMessage> = (0..10).map(|i| support(&format!("m{i}"))).collect();
        let max = max_scroll(&messages, 30, 2);
        let screen = render(&messages, 30, 2, max);
        assert!(screen.contains("m0"));
        assert!(!screen.contains("m9"));
    }
}
