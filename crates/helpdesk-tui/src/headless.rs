//! Headless mode for the helpdesk TUI.
//!
//! This module runs the TUI without a real terminal, enabling E2E testing
//! and automation. Keys are sent via channels and screen state is captured
//! after each render.

use crate::app::{App, Screen};
use crate::event::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpdesk_engine::SessionMode;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Input fed to a headless TUI.
#[derive(Debug, Clone)]
pub enum HeadlessInput {
    Key(KeyEvent),
    Action(Action),
    Paste(String),
}

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone)]
pub struct HeadlessState {
    /// Current screen being displayed.
    pub screen: Screen,
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether the TUI should quit.
    pub should_quit: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Title of the open alert, if any.
    pub alert: Option<String>,
    /// Who answers the user's messages.
    pub mode: SessionMode,
    /// Number of messages in the conversation log.
    pub message_count: usize,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            screen: Screen::Chat,
            screen_contents: String::new(),
            should_quit: false,
            show_help: false,
            alert: None,
            mode: SessionMode::Automated,
            message_count: 0,
        }
    }
}

/// Handle to control a headless TUI instance.
///
/// Use this to send input and observe state changes.
pub struct HeadlessHandle {
    input_tx: mpsc::UnboundedSender<HeadlessInput>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send a key press. Returns `true` if the TUI is still listening.
    pub fn send_key(&self, key: KeyEvent) -> bool {
        self.input_tx.send(HeadlessInput::Key(key)).is_ok()
    }

    /// Type text one key at a time.
    pub fn send_text(&self, text: &str) -> bool {
        text.chars()
            .all(|c| self.send_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    /// Send an action directly, bypassing key mapping.
    pub fn send_action(&self, action: Action) -> bool {
        self.input_tx.send(HeadlessInput::Action(action)).is_ok()
    }

    /// Paste text into the focused input.
    pub fn paste(&self, text: &str) -> bool {
        self.input_tx
            .send(HeadlessInput::Paste(text.to_string()))
            .is_ok()
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the TUI task ended
                Ok(Err(_)) | Err(_) => {
                    let state = self.state();
                    return condition(&state).then_some(state);
                }
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    /// Wait for a specific screen to be displayed.
    pub async fn wait_for_screen(
        &mut self,
        screen: Screen,
        timeout: Duration,
    ) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen == screen, timeout).await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50, // Faster tick rate for testing
        }
    }
}

/// Run the TUI in headless mode.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(App::new_for_test(), HeadlessConfig::default());
///
/// handle.send_text("my vpn is down");
/// handle.send_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
///
/// let state = handle.wait_for_text("vpn.anystate.gov", Duration::from_secs(1)).await;
///
/// handle.send_action(Action::Quit);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(
    app: App,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(app, config, input_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle { input_tx, state_rx };

    (handle, task)
}

async fn run_headless_loop(
    mut app: App,
    config: HeadlessConfig,
    mut input_rx: mpsc::UnboundedReceiver<HeadlessInput>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;
    app.resize(config.width, config.height);

    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            crate::draw(&app, area, frame.buffer_mut());
        })?;

        let screen_contents = buffer_to_string(terminal.backend().buffer());
        let _ = state_tx.send(HeadlessState {
            screen: app.screen,
            screen_contents,
            should_quit: app.should_quit,
            show_help: app.show_help,
            alert: app.alert.as_ref().map(|a| a.title.clone()),
            mode: app.session.mode(),
            message_count: app.session.messages().len(),
        });

        if app.should_quit {
            break;
        }

        tokio::select! {
            input = input_rx.recv() => match input {
                Some(HeadlessInput::Key(key)) => app.handle_key(key),
                Some(HeadlessInput::Action(action)) => {
                    app.handle_action(action);
                    app.sync_log();
                }
                Some(HeadlessInput::Paste(text)) => app.handle_paste(&text),
                // Every handle is gone
                None => break,
            },
            () = tokio::time::sleep(tick_duration) => app.tick(),
        }
    }

    Ok(())
}

/// Convert a terminal buffer to a string representation.
pub(crate) fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
