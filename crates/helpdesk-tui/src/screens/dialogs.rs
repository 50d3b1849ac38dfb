//! Modal dialogs drawn over the chat screen.

use crate::app::{Alert, AlertKind, App};
use crate::screens::chat::ChatScreen;
use crate::screens::Screen;
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

pub const CALLBACK_TITLE: &str = "Request Callback";
pub const CALLBACK_PROMPT: &str = "Please enter your phone number for a callback:";

/// Phone number dialog.
pub struct CallbackScreen;

impl Screen for CallbackScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        ChatScreen.render(app, area, buf);
        render_callback_overlay(app, area, buf);
    }
}

fn render_callback_overlay(app: &App, area: Rect, buf: &mut Buffer) {
    let width = 56.min(area.width.saturating_sub(4));
    let height = 9.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(format!(" {CALLBACK_TITLE} "))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(overlay_area);
    block.render(overlay_area, buf);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {CALLBACK_PROMPT}"), Styles::default())),
        Line::from(""),
    ];
    Paragraph::new(lines)
        .style(Styles::default())
        .render(inner, buf);

    if inner.height > 3 {
        let field = Rect::new(inner.x + 2, inner.y + 3, inner.width.saturating_sub(4), 1);
        app.callback_input
            .widget()
            .prompt("Phone: ")
            .focused(app.alert.is_none())
            .render(field, buf);
    }

    if inner.height > 5 {
        let keys = Line::from(vec![
            Span::styled("  ", Styles::default()),
            Span::styled("[Enter]", Styles::key_hint()),
            Span::styled(" Request   ", Styles::default()),
            Span::styled("[Esc]", Styles::key_hint()),
            Span::styled(" Cancel", Styles::default()),
        ]);
        buf.set_line(inner.x, inner.y + 5, &keys, inner.width);
    }
}

/// Leave-the-chat confirmation.
pub struct QuitConfirmScreen;

impl Screen for QuitConfirmScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        ChatScreen.render(app, area, buf);
        render_quit_confirm_overlay(area, buf);
    }
}

fn render_quit_confirm_overlay(area: Rect, buf: &mut Buffer) {
    let width = 40.min(area.width.saturating_sub(4));
    let height = 7.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Quit ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Leave the support chat?", Styles::default())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Styles::default()),
            Span::styled("[Enter]", Styles::key_hint()),
            Span::styled(" Quit   ", Styles::default()),
            Span::styled("[Esc]", Styles::key_hint()),
            Span::styled(" Stay", Styles::default()),
        ]),
    ];

    Paragraph::new(lines)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}

/// Render a blocking alert over whatever is on screen.
pub fn render_alert_overlay(alert: &Alert, area: Rect, buf: &mut Buffer) {
    let max_width = area.width.saturating_sub(4).max(1);
    let text_width = alert.message.width().max(alert.title.width() + 4) + 6;
    let width = u16::try_from(text_width)
        .unwrap_or(u16::MAX)
        .clamp(30.min(max_width), max_width);

    let wrap_at = usize::from(width.saturating_sub(6)).max(1);
    let wrapped = textwrap::wrap(&alert.message, wrap_at);

    // border, blank, message, blank, keys, border
    let height = u16::try_from(wrapped.len() + 5)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let title_style = match alert.kind {
        AlertKind::Warning => Styles::warning(),
        AlertKind::Error => Styles::error(),
    };
    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(title_style)
        .style(Styles::default());

    let mut lines = vec![Line::from("")];
    for line in wrapped {
        lines.push(Line::from(Span::styled(format!("  {line}"), Styles::default())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  ", Styles::default()),
        Span::styled("[Enter]", Styles::key_hint()),
        Span::styled(" OK", Styles::default()),
    ]));

    Paragraph::new(lines)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_app, render_screen_to_string};

    #[test]
    fn test_callback_dialog_contents() {
        let mut app = create_test_app();
        app.open_callback();
        app.callback_input.insert_str("555-000-1111");

        let screen = render_screen_to_string(&CallbackScreen, &app);
        assert!(screen.contains(" Request Callback "));
        assert!(screen.contains(CALLBACK_PROMPT));
        assert!(screen.contains("Phone: 555-000-1111_"));
        assert!(screen.contains("[Enter] Request   [Esc] Cancel"));
    }

    #[test]
    fn test_quit_confirm_contents() {
        let app = create_test_app();
        let screen = render_screen_to_string(&QuitConfirmScreen, &app);
        assert!(screen.contains("Leave the support chat?"));
        assert!(screen.contains("[Enter] Quit   [Esc] Stay"));
    }

    #[test]
    fn test_alert_overlay() {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        let alert = Alert::warning("Invalid Input", "Please enter a message.");
        render_alert_overlay(&alert, area, &mut buf);

        let screen = buffer_to_string(&buf);
        assert!(screen.contains(" Invalid Input "));
        assert!(screen.contains("  Please enter a message."));
        assert!(screen.contains("[Enter] OK"));
    }

    #[test]
    fn test_alert_wraps_long_message() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        let alert = Alert::error(
            "Connection Error",
            "Error connecting to the contact center: invalid instance id: bad",
        );
        render_alert_overlay(&alert, area, &mut buf);

        let screen = buffer_to_string(&buf);
        assert!(screen.contains(" Connection Error "));
        assert!(screen.contains("Error connecting to the"));
        assert!(screen.contains("[Enter] OK"));
    }
}
