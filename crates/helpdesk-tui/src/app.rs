//! Application state and update logic for the helpdesk TUI.

use crate::event::{key_to_action, Action};
use crate::ui::widgets::message_list::max_scroll;
use crate::ui::widgets::TextInputState;
use crate::ui::{chat_layout, main_layout};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpdesk_engine::{
    CallbackOutcome, Config, ConfigError, ContactCenterClients, LogReceiver, Session,
    SessionError, SessionOptions,
};
use ratatui::layout::Rect;
use tracing::{debug, warn};

/// Ticks a notification stays visible (~3 seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// The current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Chat,
    /// The phone number dialog is open over the chat.
    CallbackRequest,
    QuitConfirm,
}

/// Severity of a blocking alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Warning,
    Error,
}

/// A blocking message box. Input goes nowhere else until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Current screen.
    pub screen: Screen,

    /// Title shown in the header.
    pub title: String,

    /// The chat session driving the transcript.
    pub session: Session,

    /// Chat message input.
    pub input_state: TextInputState,

    /// Phone number input for the callback dialog.
    pub callback_input: TextInputState,

    /// Transcript lines scrolled up from the newest entry.
    pub transcript_scroll: usize,

    /// Blocking alert, if one is open.
    pub alert: Option<Alert>,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Tick counter.
    pub tick: usize,

    /// Contact-center clients, when configured and valid.
    pub contact_center: Option<ContactCenterClients>,

    /// Last known terminal size.
    viewport: Rect,

    /// Appends from the session log.
    log_rx: LogReceiver,
}

impl App {
    /// Create a new app for the given configuration.
    ///
    /// A contact-center setup failure is shown as an error dialog rather
    /// than returned.
    pub fn new(config: &Config, display_name: impl Into<String>) -> Result<Self, ConfigError> {
        let options = config.session_options(display_name)?;
        let mut app = Self::with_session(config.title.clone(), options);

        if let Some(cc) = &config.contact_center {
            match ContactCenterClients::connect(cc) {
                Ok(clients) => app.contact_center = Some(clients),
                Err(e) => {
                    warn!(error = %e, "Contact center setup failed");
                    app.alert = Some(Alert::error(
                        "Connection Error",
                        format!("Error connecting to the contact center: {e}"),
                    ));
                }
            }
        }

        Ok(app)
    }

    /// Create an app with default settings and a fixed user name.
    pub fn new_for_test() -> Self {
        let config = Config::default();
        Self::with_session(config.title, SessionOptions::new("Test User"))
    }

    fn with_session(title: String, options: SessionOptions) -> Self {
        let mut session = Session::with_options(options);
        let log_rx = session.subscribe();

        Self {
            should_quit: false,
            show_help: false,
            screen: Screen::Chat,
            title,
            session,
            input_state: TextInputState::new(),
            callback_input: TextInputState::new(),
            transcript_scroll: 0,
            alert: None,
            notification: None,
            notification_ttl: 0,
            tick: 0,
            contact_center: None,
            viewport: Rect::new(0, 0, 80, 24),
            log_rx,
        }
    }

    /// Handle a key press.
    ///
    /// The focused text input sees the key first; anything it does not
    /// consume is mapped to an [`Action`].
    pub fn handle_key(&mut self, key: KeyEvent) {
        let consumed = if self.alert.is_some() || self.show_help {
            false
        } else {
            match self.screen {
                Screen::Chat => self.handle_chat_input(key),
                Screen::CallbackRequest => edit_line(&mut self.callback_input, key),
                Screen::QuitConfirm => false,
            }
        };

        if !consumed {
            self.handle_action(key_to_action(key));
        }
        self.sync_log();
    }

    /// Insert pasted text into the focused input.
    pub fn handle_paste(&mut self, text: &str) {
        if self.alert.is_some() || self.show_help {
            return;
        }
        match self.screen {
            Screen::Chat => self.input_state.insert_str(text),
            Screen::CallbackRequest => {
                // The phone field is a single line.
                let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.callback_input.insert_str(&line);
            }
            Screen::QuitConfirm => {}
        }
    }

    /// An open alert swallows everything except quit and dismiss.
    fn handle_alert_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Select | Action::Back => self.alert = None,
            _ => {}
        }
    }

    /// Text editing for the chat input. Returns true if the key was consumed.
    fn handle_chat_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up if self.input_state.is_browsing_history() => {
                self.input_state.history_prev();
                true
            }
            // Falls through to scrolling when there is no history yet.
            KeyCode::Up if self.input_state.is_empty() => self.input_state.history_prev(),
            KeyCode::Down if self.input_state.is_browsing_history() => {
                self.input_state.history_next();
                true
            }
            KeyCode::Home | KeyCode::End if self.input_state.is_empty() => false,
            _ => edit_line(&mut self.input_state, key),
        }
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        if self.alert.is_some() {
            self.handle_alert_action(action);
            return;
        }

        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            if action != Action::None {
                self.show_help = false;
            }
            return;
        }

        match self.screen {
            Screen::Chat => self.handle_chat_action(action),
            Screen::CallbackRequest => self.handle_callback_action(action),
            Screen::QuitConfirm => self.handle_quit_confirm_action(action),
        }
    }

    fn handle_chat_action(&mut self, action: Action) {
        match action {
            Action::Select => self.send_message(),
            Action::Newline => self.input_state.insert('\n'),
            Action::LiveAgent => self.connect_live_agent(),
            Action::Callback => self.open_callback(),
            Action::Back => self.screen = Screen::QuitConfirm,
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(self.transcript_page()),
            Action::PageDown => self.scroll_down(self.transcript_page()),
            Action::ScrollBottom => self.transcript_scroll = 0,
            _ => {}
        }
    }

    fn handle_callback_action(&mut self, action: Action) {
        match action {
            Action::Select => self.confirm_callback(),
            Action::Back => self.cancel_callback(),
            _ => {}
        }
    }

    fn handle_quit_confirm_action(&mut self, action: Action) {
        match action {
            Action::Select => self.should_quit = true,
            Action::Back => self.screen = Screen::Chat,
            _ => {}
        }
    }

    /// Submit the chat input. Blank input opens a warning and keeps the text.
    pub fn send_message(&mut self) {
        match self.session.submit(self.input_state.content()) {
            Ok(submission) => {
                debug!(
                    appended = submission.appended,
                    mode = %submission.answered_by,
                    "Message sent"
                );
                self.input_state.submit();
            }
            Err(e) => self.alert = Some(Alert::warning("Invalid Input", e.to_string())),
        }
        self.sync_log();
    }

    /// Switch the session to a live agent.
    pub fn connect_live_agent(&mut self) {
        match self.session.connect_live_agent() {
            Ok(()) => {}
            Err(SessionError::AlreadyConnected) => {
                self.set_notification("Already connected to a live agent".to_string());
            }
            Err(e) => self.alert = Some(Alert::warning("Live Agent", e.to_string())),
        }
        self.sync_log();
    }

    /// Open the callback dialog with an empty number.
    pub fn open_callback(&mut self) {
        self.callback_input.clear();
        self.screen = Screen::CallbackRequest;
    }

    /// Confirm the callback dialog. Blank input keeps it open behind a warning.
    pub fn confirm_callback(&mut self) {
        match CallbackOutcome::from_input(self.callback_input.content()) {
            Ok(outcome) => {
                self.session.record_callback(&outcome);
                self.callback_input.clear();
                self.screen = Screen::Chat;
            }
            Err(e) => self.alert = Some(Alert::warning("Invalid Input", e.to_string())),
        }
        self.sync_log();
    }

    /// Dismiss the callback dialog without scheduling anything.
    pub fn cancel_callback(&mut self) {
        self.session.record_callback(&CallbackOutcome::Cancelled);
        self.callback_input.clear();
        self.screen = Screen::Chat;
    }

    /// Drain log notifications, returning to the newest entry on any append.
    pub fn sync_log(&mut self) -> usize {
        let mut appended = 0;
        while self.log_rx.try_recv().is_ok() {
            appended += 1;
        }
        if appended > 0 {
            self.transcript_scroll = 0;
        }
        appended
    }

    /// Record the terminal size used for scroll limits.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.transcript_scroll = self.transcript_scroll.min(self.max_transcript_scroll());
    }

    /// Inner area of the transcript pane for the current terminal size.
    fn transcript_inner(&self) -> Rect {
        let (main_area, _) = main_layout(self.viewport);
        let transcript = chat_layout(main_area).transcript;
        Rect::new(
            transcript.x + 1,
            transcript.y + 1,
            transcript.width.saturating_sub(2),
            transcript.height.saturating_sub(2),
        )
    }

    fn transcript_page(&self) -> usize {
        usize::from(self.transcript_inner().height).max(1)
    }

    fn max_transcript_scroll(&self) -> usize {
        let inner = self.transcript_inner();
        max_scroll(
            self.session.messages(),
            usize::from(inner.width),
            usize::from(inner.height),
        )
    }

    fn scroll_up(&mut self, lines: usize) {
        let max = self.max_transcript_scroll();
        self.transcript_scroll = (self.transcript_scroll + lines).min(max);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        self.sync_log();
    }
}

/// Standard editing keys shared by both inputs. Returns true if consumed.
fn edit_line(input: &mut TextInputState, key: KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_engine::ContactCenterConfig;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn last_text(app: &App) -> &str {
        app.session.messages().last().map(|m| m.text()).unwrap_or("")
    }

    #[test]
    fn test_screen_default() {
        assert_eq!(Screen::default(), Screen::Chat);
    }

    #[test]
    fn test_new_for_test_starts_with_welcome() {
        let app = create();
        assert_eq!(app.session.messages().len(), 1);
        assert!(last_text(&app).starts_with("Welcome to AnyState IT Support"));
        assert_eq!(app.session.display_name(), "Test User");
    }

    fn create() -> App {
        App::new_for_test()
    }

    #[test]
    fn test_typing_then_enter_sends() {
        let mut app = create();
        type_text(&mut app, "My VPN is down");
        app.handle_key(key(KeyCode::Enter));

        let messages = app.session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text(), "My VPN is down");
        assert!(messages[1].is_user());
        assert!(messages[2].text().contains("vpn.anystate.gov"));
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_blank_send_warns_and_keeps_log() {
        let mut app = create();
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.session.messages().len(), 1);
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.title, "Invalid Input");
        assert_eq!(alert.message, "Please enter a message.");
        assert_eq!(app.input_state.content(), "   ");

        // Alert swallows keys until dismissed
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.input_state.content(), "   ");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.alert.is_none());
        assert_eq!(app.session.messages().len(), 1);
    }

    #[test]
    fn test_alert_blocks_direct_actions() {
        let mut app = create();
        app.alert = Some(Alert::warning("Invalid Input", "Please enter a message."));

        app.handle_action(Action::LiveAgent);
        app.handle_action(Action::Callback);
        app.handle_action(Action::ScrollUp);
        app.handle_action(Action::Help);
        assert!(!app.session.is_live_agent());
        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.session.messages().len(), 1);
        assert!(!app.show_help);
        assert!(app.alert.is_some());

        app.handle_action(Action::Back);
        assert!(app.alert.is_none());
        app.handle_action(Action::LiveAgent);
        assert!(app.session.is_live_agent());
    }

    #[test]
    fn test_ctrl_c_quits_through_alert() {
        let mut app = create();
        app.alert = Some(Alert::error("Connection Error", "bad"));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = create();
        type_text(&mut app, "a");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut app, "b");
        assert_eq!(app.input_state.content(), "a\nb");
        assert_eq!(app.session.messages().len(), 1);
    }

    #[test]
    fn test_live_agent_flow() {
        let mut app = create();
        app.handle_key(key(KeyCode::F(2)));
        assert!(app.session.is_live_agent());
        assert_eq!(app.session.messages().len(), 3);

        type_text(&mut app, "password reset please");
        app.handle_key(key(KeyCode::Enter));
        let messages = app.session.messages();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[4].text(), "Agent is typing...");
        assert_eq!(
            messages[5].text(),
            "Thank you for your message. An IT support specialist will assist you shortly."
        );
    }

    #[test]
    fn test_second_live_agent_request_only_notifies() {
        let mut app = create();
        app.handle_action(Action::LiveAgent);
        let len = app.session.messages().len();

        app.handle_action(Action::LiveAgent);
        assert_eq!(app.session.messages().len(), len);
        assert_eq!(
            app.notification.as_deref(),
            Some("Already connected to a live agent")
        );
    }

    #[test]
    fn test_callback_confirm() {
        let mut app = create();
        app.handle_key(key(KeyCode::F(3)));
        assert_eq!(app.screen, Screen::CallbackRequest);

        type_text(&mut app, "555-000-1111");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.session.messages().len(), 2);
        assert!(last_text(&app).contains("555-000-1111"));
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_callback_blank_keeps_dialog_open() {
        let mut app = create();
        app.handle_action(Action::Callback);
        type_text(&mut app, "  ");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.screen, Screen::CallbackRequest);
        assert_eq!(
            app.alert.as_ref().map(|a| a.message.as_str()),
            Some("Please enter a valid phone number.")
        );
        assert_eq!(app.session.messages().len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert!(app.alert.is_none());
        assert_eq!(app.screen, Screen::CallbackRequest);
    }

    #[test]
    fn test_callback_cancel_leaves_log() {
        let mut app = create();
        app.handle_action(Action::Callback);
        type_text(&mut app, "555");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.session.messages().len(), 1);
        assert!(app.callback_input.is_empty());
    }

    #[test]
    fn test_quit_confirm() {
        let mut app = create();
        app.handle_action(Action::Back);
        assert_eq!(app.screen, Screen::QuitConfirm);
        assert!(!app.should_quit);

        app.handle_action(Action::Back);
        assert_eq!(app.screen, Screen::Chat);

        app.handle_action(Action::Back);
        app.handle_action(Action::Select);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = create();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggle_and_close() {
        let mut app = create();
        app.handle_key(key(KeyCode::F(1)));
        assert!(app.show_help);

        // Esc closes help instead of asking to quit
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert_eq!(app.screen, Screen::Chat);
    }

    #[test]
    fn test_history_on_empty_input() {
        let mut app = create();
        type_text(&mut app, "first");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "second");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.input_state.content(), "second");
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.input_state.content(), "first");
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.input_state.content(), "second");
        app.handle_key(key(KeyCode::Down));
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_scroll_clamps_and_resets_on_append() {
        let mut app = create();
        app.resize(40, 16);
        for i in 0..6 {
            type_text(&mut app, &format!("question {i}"));
            app.handle_key(key(KeyCode::Enter));
        }

        for _ in 0..50 {
            app.handle_action(Action::PageUp);
        }
        let max = app.max_transcript_scroll();
        assert!(max > 0);
        assert_eq!(app.transcript_scroll, max);

        app.handle_action(Action::ScrollDown);
        assert_eq!(app.transcript_scroll, max - 1);

        type_text(&mut app, "another");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_up_without_history_scrolls() {
        let mut app = create();
        app.resize(40, 12);
        for _ in 0..3 {
            type_text(&mut app, "hello");
            app.handle_key(key(KeyCode::Enter));
        }
        // Clear history by starting from a fresh input state
        app.input_state = TextInputState::new();
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.transcript_scroll, 1);
    }

    #[test]
    fn test_end_on_empty_input_returns_to_bottom() {
        let mut app = create();
        app.transcript_scroll = 3;
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_invalid_contact_center_shows_error() {
        let config = Config {
            contact_center: Some(ContactCenterConfig {
                region: "us-east-1".into(),
                instance_id: "not-a-uuid".into(),
            }),
            ..Config::default()
        };
        let app = App::new(&config, "Jo").unwrap();
        let alert = app.alert.unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.title, "Connection Error");
        assert!(alert
            .message
            .starts_with("Error connecting to the contact center: "));
        assert!(app.contact_center.is_none());
    }

    #[test]
    fn test_valid_contact_center_is_kept() {
        let config = Config {
            contact_center: Some(ContactCenterConfig {
                region: "us-east-1".into(),
                instance_id: "6f1c1a52-3f0a-4c4e-9a53-2f6f0b0d9a11".into(),
            }),
            ..Config::default()
        };
        let app = App::new(&config, "Jo").unwrap();
        assert!(app.alert.is_none());
        assert_eq!(
            app.contact_center.as_ref().map(ContactCenterClients::region),
            Some("us-east-1")
        );
    }

    #[test]
    fn test_notification_expires() {
        let mut app = create();
        app.set_notification("hello".to_string());
        for _ in 0..NOTIFICATION_TICKS {
            app.tick();
        }
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_paste_into_callback_is_single_line() {
        let mut app = create();
        app.open_callback();
        app.handle_paste("555\n0001");
        assert_eq!(app.callback_input.content(), "5550001");
    }
}
