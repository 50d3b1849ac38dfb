//! Theme and styling definitions for the helpdesk TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(0, 120, 215);
    pub const HEADER_BG: Color = Color::Rgb(0, 51, 102);

    // Message colors
    pub const USER: Color = Color::Rgb(170, 230, 150);
    pub const SUPPORT: Color = Color::Rgb(220, 220, 230);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 90, 140);

    // Status colors
    pub const WARNING: Color = Color::Rgb(240, 200, 100);
    pub const ERROR: Color = Color::Rgb(240, 100, 100);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(130, 170, 255);
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Input prompt and cursor.
    pub fn active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE).bg(Palette::BG)
    }

    /// Header bar.
    pub fn header() -> Style {
        Style::default().fg(Color::White).bg(Palette::HEADER_BG)
    }

    /// Header title.
    pub fn header_title() -> Style {
        Self::header().add_modifier(Modifier::BOLD)
    }

    /// Text of a message the user wrote.
    pub fn user_message() -> Style {
        Style::default().fg(Palette::USER).bg(Palette::BG)
    }

    /// Text of a support-side message.
    pub fn support_message() -> Style {
        Style::default().fg(Palette::SUPPORT).bg(Palette::BG)
    }

    /// Sender name above a message.
    pub fn sender() -> Style {
        Self::default().add_modifier(Modifier::BOLD)
    }

    /// Enabled button.
    pub fn button() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Disabled button.
    pub fn button_disabled() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::STATUS_BG)
    }

    /// Warning status.
    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::BG)
    }

    /// Error status.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::BORDER_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_support_styles_differ() {
        assert_ne!(Styles::user_message(), Styles::support_message());
        assert_ne!(Styles::button(), Styles::button_disabled());
    }
}
