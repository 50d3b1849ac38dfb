//! Callback request values.
//!
//! Collecting a phone number is modelled as a plain request/response: a
//! front end hands back either a validated number or a cancellation.

use crate::session::SessionError;
use serde::Serialize;
use std::fmt;

/// A non-blank phone number as entered by the user.
///
/// Only blankness is checked; the digits are taken as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate raw input, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::BlankPhoneNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of the callback dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The user confirmed a number.
    Requested(PhoneNumber),
    /// The user dismissed the dialog.
    Cancelled,
}

impl CallbackOutcome {
    /// Validate raw dialog input into an outcome.
    pub fn from_input(raw: &str) -> Result<Self, SessionError> {
        PhoneNumber::parse(raw).map(Self::Requested)
    }
}

/// A blocking source of callback outcomes (e.g. a line-based prompt).
pub trait CallbackPrompt {
    /// Ask for a phone number and return once the user confirms or cancels.
    fn collect(&mut self) -> CallbackOutcome;
}

impl<F> CallbackPrompt for F
where
    F: FnMut() -> CallbackOutcome,
{
    fn collect(&mut self) -> CallbackOutcome {
        self()
    }
}
