//! Chat session: the log, the reply path and the live-agent switch.
//!
//! Every operation runs to completion on the caller's thread. Messages
//! are appended in the order the user would read them.

use crate::callback::{CallbackOutcome, CallbackPrompt};
use crate::log::{ConversationLog, LogReceiver};
use crate::message::ChatMessage;
use crate::resolver::ReplyResolver;
use tracing::{debug, info};
use uuid::Uuid;

/// Default sender name for support-side messages.
pub const SUPPORT_NAME: &str = "IT Support";

/// Greeting appended when a session starts.
pub const WELCOME_MESSAGE: &str = "Welcome to AnyState IT Support. How can I help you today?";

pub const CONNECTING_MESSAGE: &str = "Connecting you to a live agent. Please wait a moment...";

pub const CONNECTED_MESSAGE: &str = "You are now connected with a live agent. Please note that live agent support is available Monday to Friday, 9 AM to 5 PM.";

pub const AGENT_TYPING_MESSAGE: &str = "Agent is typing...";

pub const AGENT_ACK_MESSAGE: &str =
    "Thank you for your message. An IT support specialist will assist you shortly.";

/// Confirmation text for a scheduled callback.
pub fn callback_confirmation(phone: &str) -> String {
    format!(
        "A callback has been scheduled to {phone}. An IT support specialist will call you shortly during business hours (Monday to Friday, 9 AM to 5 PM)."
    )
}

/// Which path answers the user's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Replies come from the keyword resolver.
    #[default]
    Automated,
    /// Replies are the canned live-agent acknowledgement. Terminal.
    LiveAgent,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automated => write!(f, "Automated"),
            Self::LiveAgent => write!(f, "Live Agent"),
        }
    }
}

/// What a successful submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Mode that produced the reply.
    pub answered_by: SessionMode,
    /// Messages appended, including the user's own.
    pub appended: usize,
}

/// Session-level options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Name shown on the user's messages.
    pub display_name: String,
    /// Name shown on support-side messages.
    pub support_name: String,
    /// First message of the conversation.
    pub welcome_message: String,
    pub resolver: ReplyResolver,
}

impl SessionOptions {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            support_name: SUPPORT_NAME.into(),
            welcome_message: WELCOME_MESSAGE.into(),
            resolver: ReplyResolver::default(),
        }
    }
}

/// A single chat session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    log: ConversationLog,
    mode: SessionMode,
    resolver: ReplyResolver,
    display_name: String,
    support_name: String,
}

impl Session {
    /// Start a session with default options.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self::with_options(SessionOptions::new(display_name))
    }

    /// Start a session and append the welcome message.
    pub fn with_options(options: SessionOptions) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            log: ConversationLog::new(),
            mode: SessionMode::Automated,
            resolver: options.resolver,
            display_name: options.display_name,
            support_name: options.support_name,
        };
        info!(session = %session.id, user = %session.display_name, "Session started");
        session.say(options.welcome_message);
        session
    }

    /// Submit user text and append the reply.
    pub fn submit(&mut self, text: &str) -> Result<Submission, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let before = self.log.len();
        self.log
            .append(ChatMessage::user(self.display_name.clone(), text));

        match self.mode {
            SessionMode::Automated => {
                let reply = self.resolver.resolve(text).to_string();
                self.say(reply);
            }
            SessionMode::LiveAgent => {
                debug!(session = %self.id, "Forwarding message to live agent");
                self.say(AGENT_TYPING_MESSAGE);
                self.say(AGENT_ACK_MESSAGE);
            }
        }

        Ok(Submission {
            answered_by: self.mode,
            appended: self.log.len() - before,
        })
    }

    /// Switch to live-agent mode. Fails if already connected.
    pub fn connect_live_agent(&mut self) -> Result<(), SessionError> {
        if self.mode == SessionMode::LiveAgent {
            return Err(SessionError::AlreadyConnected);
        }
        self.say(CONNECTING_MESSAGE);
        self.mode = SessionMode::LiveAgent;
        info!(session = %self.id, "Connected to live agent");
        self.say(CONNECTED_MESSAGE);
        Ok(())
    }

    /// Run a blocking prompt and record its outcome.
    pub fn request_callback(&mut self, prompt: &mut dyn CallbackPrompt) -> CallbackOutcome {
        let outcome = prompt.collect();
        self.record_callback(&outcome);
        outcome
    }

    /// Record the outcome of a callback dialog.
    pub fn record_callback(&mut self, outcome: &CallbackOutcome) {
        match outcome {
            CallbackOutcome::Requested(phone) => {
                info!(session = %self.id, "Callback requested");
                self.say(callback_confirmation(phone.as_str()));
            }
            CallbackOutcome::Cancelled => {
                debug!(session = %self.id, "Callback request cancelled");
            }
        }
    }

    /// Attach an observer to the log.
    pub fn subscribe(&mut self) -> LogReceiver {
        self.log.subscribe()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_live_agent(&self) -> bool {
        self.mode == SessionMode::LiveAgent
    }

    pub fn resolver(&self) -> &ReplyResolver {
        &self.resolver
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn support_name(&self) -> &str {
        &self.support_name
    }

    fn say(&mut self, text: impl Into<String>) {
        self.log
            .append(ChatMessage::system(self.support_name.clone(), text));
    }
}

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Submitted text was empty or whitespace.
    #[error("Please enter a message.")]
    EmptyMessage,

    /// Callback phone number was empty or whitespace.
    #[error("Please enter a valid phone number.")]
    BlankPhoneNumber,

    /// Live agent was already connected.
    #[error("Already connected to a live agent")]
    AlreadyConnected,
}
