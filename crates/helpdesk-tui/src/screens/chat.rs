//! Chat screen: header, transcript, input and command buttons.

use crate::app::{App, Screen as AppScreen};
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, MessageList, StatusBar};
use crate::ui::{chat_layout, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The main chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let layout = chat_layout(main_area);

        render_header(app, layout.header, buf);
        render_transcript(app, layout.transcript, buf);
        render_input(app, layout.input, buf);
        render_buttons(app, layout.buttons, buf);

        let mode = app.session.mode().to_string();
        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("F1", "Help"),
            KeyHint::new("Esc", "Quit"),
        ];
        let mut status_bar = StatusBar::new(&mode).hints(hints);
        if let Some(notification) = &app.notification {
            status_bar = status_bar.right(notification);
        } else if let Some(clients) = &app.contact_center {
            status_bar = status_bar.right(clients.region());
        }
        status_bar.render(status_area, buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(format!(" {}", app.title), Styles::header_title())),
        Line::from(Span::styled(
            format!(" Welcome, {}", app.session.display_name()),
            Styles::header(),
        )),
    ];
    Paragraph::new(lines)
        .style(Styles::header())
        .render(area, buf);
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let title = if app.transcript_scroll > 0 {
        format!(" Conversation (+{} below) ", app.transcript_scroll)
    } else {
        " Conversation ".to_string()
    };
    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    MessageList::new(app.session.messages())
        .scroll_from_bottom(app.transcript_scroll)
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.screen == AppScreen::Chat && app.alert.is_none() && !app.show_help;
    let block = Block::default()
        .title(" Message ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .focused(focused)
        .placeholder("Type your question...")
        .render(inner, buf);
}

fn render_buttons(app: &App, area: Rect, buf: &mut Buffer) {
    let live_style = if app.session.is_live_agent() {
        Styles::button_disabled()
    } else {
        Styles::button()
    };
    let line = Line::from(vec![
        Span::styled(" ", Styles::default()),
        Span::styled(" [F2] Request Live Agent ", live_style),
        Span::styled("  ", Styles::default()),
        Span::styled(" [F3] Request Callback ", Styles::button()),
    ]);
    Paragraph::new(line)
        .style(Styles::default())
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_test_app, render_screen_to_string};

    #[test]
    fn test_renders_header_and_welcome() {
        let app = create_test_app();
        let screen = render_screen_to_string(&ChatScreen, &app);
        let rows: Vec<&str> = screen.lines().collect();

        assert_eq!(rows[0], " AnyState IT Support");
        assert_eq!(rows[1], " Welcome, Test User");
        assert!(screen.contains(" Conversation "));
        assert!(screen.contains("Welcome to AnyState IT Support."));
        assert!(screen.contains("[F2] Request Live Agent"));
        assert!(screen.contains("[F3] Request Callback"));
        assert!(screen.contains("Type your question..."));
        assert!(rows[23].starts_with(" Automated "));
    }

    #[test]
    fn test_status_bar_shows_live_agent_mode() {
        let mut app = create_test_app();
        app.handle_action(Action::LiveAgent);
        let screen = render_screen_to_string(&ChatScreen, &app);
        let last = screen.lines().last().unwrap_or_default();
        assert!(last.starts_with(" Live Agent "));
        assert!(screen.contains("You are now connected with a live agent."));
    }

    #[test]
    fn test_scrolled_transcript_title() {
        let mut app = create_test_app();
        app.transcript_scroll = 2;
        let screen = render_screen_to_string(&ChatScreen, &app);
        assert!(screen.contains(" Conversation (+2 below) "));
    }

    #[test]
    fn test_notification_replaces_region() {
        let mut app = create_test_app();
        app.handle_action(Action::LiveAgent);
        app.handle_action(Action::LiveAgent);
        let screen = render_screen_to_string(&ChatScreen, &app);
        assert!(screen.contains("Already connected to a live agent"));
    }
}
