//! helpdesk-engine: Headless core for the AnyState IT support chat
//!
//! This crate provides the chat logic with no UI attached:
//! - Append-only conversation log with observers
//! - Keyword reply resolver driven by an ordered rule table
//! - Session mode switching to a simulated live agent
//! - Callback requests, identity lookup and configuration

pub mod callback;
pub mod config;
pub mod contact_center;
pub mod identity;
pub mod log;
pub mod message;
pub mod resolver;
pub mod session;

// Re-export commonly used types
pub use callback::{CallbackOutcome, CallbackPrompt, PhoneNumber};
pub use config::{Config, ConfigError, RuleConfig};
pub use contact_center::{ContactCenterClients, ContactCenterConfig, ContactCenterError};
pub use identity::{
    local_account_name, resolve_display_name, Directory, IdentityError, PasswdDirectory,
};
pub use log::{ConversationLog, LogEvent, LogReceiver};
pub use message::ChatMessage;
pub use resolver::{resolve, ReplyResolver, Rule, Trigger};
pub use session::{Session, SessionError, SessionMode, SessionOptions, Submission};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
