//! Test utilities for helpdesk-tui rendering and integration tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use ratatui::{buffer::Buffer, layout::Rect};

pub(crate) use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test app with a fixed user name.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen at custom dimensions.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string_trims_rows() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(2, 2, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\n\n  World");
    }
}
