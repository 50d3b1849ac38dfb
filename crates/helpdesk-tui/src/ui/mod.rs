//! UI module for the helpdesk TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
