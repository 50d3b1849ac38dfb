//! helpdesk-tui: Terminal UI for the AnyState IT support chat
//!
//! This crate provides the TUI layer for the helpdesk, including:
//! - Chat screen with transcript, multi-line input and command buttons
//! - Callback, quit and alert dialogs
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{Alert, AlertKind, App, Screen};
pub use event::{Action, Event, EventHandler};
pub use helpdesk_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, buffer::Buffer, layout::Rect, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// Event pump tick rate (4 Hz).
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let mut events = EventHandler::new(TICK_RATE_MS);
    info!(session = %app.session.id(), "TUI started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            draw(app, area, frame.buffer_mut());
        })?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => {
                // Some platforms also report releases
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                _ => {}
            },
            Event::Paste(text) => app.handle_paste(&text),
            Event::Tick => app.tick(),
            Event::Resize(width, height) => app.resize(width, height),
        }

        if app.should_quit {
            break;
        }
    }

    info!(
        session = %app.session.id(),
        messages = app.session.messages().len(),
        "TUI closed"
    );
    Ok(())
}

/// Render the current screen and any overlays.
fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    match app.screen {
        Screen::Chat => screens::chat::ChatScreen.render(app, area, buf),
        Screen::CallbackRequest => screens::dialogs::CallbackScreen.render(app, area, buf),
        Screen::QuitConfirm => screens::dialogs::QuitConfirmScreen.render(app, area, buf),
    }

    if app.show_help {
        screens::render_help_overlay(area, buf);
    }

    // Alerts block everything, so they sit on top
    if let Some(alert) = &app.alert {
        screens::dialogs::render_alert_overlay(alert, area, buf);
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

/// Rendering of whole frames: screen plus overlays.
#[cfg(test)]
mod draw_tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_app, TEST_HEIGHT, TEST_WIDTH};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn frame(app: &App) -> String {
        let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
        let mut buf = Buffer::empty(area);
        draw(app, area, &mut buf);
        buffer_to_string(&buf)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_help_overlay_drawn() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::F(1)));
        let screen = frame(&app);
        assert!(screen.contains(" Help "));
        assert!(screen.contains("Request live agent"));
    }

    #[test]
    fn test_blank_send_draws_warning() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Enter));
        let screen = frame(&app);
        assert!(screen.contains(" Invalid Input "));
        assert!(screen.contains("Please enter a message."));
    }

    #[test]
    fn test_blank_phone_warning_over_callback_dialog() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::F(3)));
        app.handle_key(key(KeyCode::Enter));

        let screen = frame(&app);
        assert!(screen.contains(" Request Callback "));
        assert!(screen.contains("Please enter a valid phone number."));
    }

    #[test]
    fn test_quit_confirm_drawn() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(frame(&app).contains("Leave the support chat?"));
    }
}
