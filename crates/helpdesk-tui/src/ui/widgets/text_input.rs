//! Multi-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// A multi-line text input widget.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    /// The text content.
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    /// Whether the input is focused.
    focused: bool,
    /// Placeholder text.
    placeholder: Option<&'a str>,
    /// Prompt prefix (e.g., "> ").
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Set focus state.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the prompt prefix.
    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        if self.content.is_empty() {
            let mut spans = vec![Span::styled(self.prompt, Styles::active())];
            if self.focused {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let indent = " ".repeat(self.prompt.chars().count());
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut cursor_drawn = false;

        for (index, ch) in self.content.chars().enumerate() {
            if self.focused && index == self.cursor && !cursor_drawn {
                current.push(if ch == '\n' { '_' } else { '|' });
                cursor_drawn = true;
            }
            if ch == '\n' {
                lines.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        if self.focused && !cursor_drawn {
            current.push('_');
        }
        lines.push(current);

        // Keep the cursor line visible when the text is taller than the box.
        let cursor_line = self
            .content
            .chars()
            .take(self.cursor)
            .filter(|&c| c == '\n')
            .count();
        let height = usize::from(area.height);
        let skip = (cursor_line + 1).saturating_sub(height);

        let rendered: Vec<Line<'_>> = lines
            .into_iter()
            .enumerate()
            .skip(skip)
            .map(|(i, text)| {
                let lead = if i == 0 { self.prompt.to_string() } else { indent.clone() };
                Line::from(vec![
                    Span::styled(lead, Styles::active()),
                    Span::styled(text, Styles::default()),
                ])
            })
            .collect();

        Paragraph::new(rendered)
            .style(Styles::default())
            .render(area, buf);
    }
}

/// State for a text input, managing content and cursor position.
///
/// The cursor is a character index, so multi-byte input edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    /// Submitted entries for up/down navigation.
    history: Vec<String>,
    /// Position in history while browsing (None = editing new input).
    history_index: Option<usize>,
    /// Input being edited before history browsing started.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(offset, _)| offset)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert(offset, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert_str(offset, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content into history and clear.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Whether a history entry is currently shown.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// Navigate to previous history entry. Returns false if there is none.
    pub fn history_prev(&mut self) -> bool {
        let next = match self.history_index {
            None if self.history.is_empty() => return false,
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(_) => return false,
        };
        self.history_index = Some(next);
        self.content = self.history[self.history.len() - 1 - next].clone();
        self.move_end();
        true
    }

    /// Navigate to next history entry.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.content = std::mem::take(&mut self.saved_input);
                self.history_index = None;
                self.move_end();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.move_end();
            }
        }
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            content: &self.content,
            cursor: self.cursor,
            focused: true,
            placeholder: None,
            prompt: "> ",
        }
    }
}
