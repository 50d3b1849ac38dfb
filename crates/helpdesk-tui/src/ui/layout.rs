//! Layout helpers for the helpdesk TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Areas of the chat window, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub buttons: Rect,
}

/// Split the main area into header, transcript, input and button row.
pub fn chat_layout(area: Rect) -> ChatLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Transcript
            Constraint::Length(5), // Input
            Constraint::Length(1), // Buttons
        ])
        .split(area);
    ChatLayout {
        header: chunks[0],
        transcript: chunks[1],
        input: chunks[2],
        buttons: chunks[3],
    }
}
