//! Screen definitions for the helpdesk TUI.

pub mod chat;
pub mod dialogs;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Chat
    Enter             Send message
    Shift+Enter       New line
    Up/Down           History / scroll
    PgUp/PgDn         Scroll conversation
    End               Back to newest

  Support
    F2 or Ctrl+L      Request live agent
    F3 or Ctrl+B      Request callback

  F1 help   Esc quit   Ctrl+C exit now
";

    let width = 52.min(area.width.saturating_sub(4));
    let height = 18.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
