//! Keyword reply resolver.
//!
//! Replies come from an ordered rule table. The input is lowercased once,
//! rules are tried top to bottom and the first match wins; anything that
//! matches nothing gets the fallback text.

use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Reply for password reset questions.
pub const PASSWORD_RESET_REPLY: &str = "To reset your password, please visit the self-service portal at https://reset.anystate.gov or call the IT helpdesk at 555-123-4567.";

/// Reply for software installation questions.
pub const SOFTWARE_REQUEST_REPLY: &str = "For software installation requests, please use the Software Request form in the Employee Portal. An IT technician will review and process your request.";

/// Reply for VPN and remote access questions.
pub const VPN_REPLY: &str = "For VPN access or remote connectivity issues, please ensure you're using the latest AnyState VPN client. For installation instructions, visit https://vpn.anystate.gov";

/// Reply when no rule matches.
pub const FALLBACK_REPLY: &str =
    "I'm not sure I understand your question. Would you like to speak with a live IT support agent?";

/// Condition a lowercased input must satisfy for a rule to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "phrases", rename_all = "snake_case")]
pub enum Trigger {
    /// Input contains the phrase.
    Contains(String),
    /// Input contains at least one of the phrases.
    ContainsAny(Vec<String>),
}

impl Trigger {
    /// Build a trigger from configured keywords, lowercasing them.
    ///
    /// A single keyword becomes [`Trigger::Contains`].
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Self {
        let mut phrases: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .collect();
        if phrases.len() == 1 {
            Self::Contains(phrases.remove(0))
        } else {
            Self::ContainsAny(phrases)
        }
    }

    /// Test an already lowercased input.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Contains(phrase) => lowered.contains(phrase.as_str()),
            Self::ContainsAny(phrases) => phrases.iter().any(|p| lowered.contains(p.as_str())),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Short identifier used in logs and CLI output.
    pub name: String,
    pub trigger: Trigger,
    pub response: String,
}

impl Rule {
    pub fn new(name: impl Into<String>, trigger: Trigger, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger,
            response: response.into(),
        }
    }
}

/// Ordered rule table with a fallback reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyResolver {
    rules: Vec<Rule>,
    fallback: String,
}

impl ReplyResolver {
    /// Create a resolver from an explicit table.
    pub fn new(rules: Vec<Rule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// The rule that would answer `input`, if any.
    pub fn matched_rule(&self, input: &str) -> Option<&Rule> {
        let lowered = input.to_lowercase();
        self.rules.iter().find(|rule| rule.trigger.matches(&lowered))
    }

    /// Produce the reply for `input`.
    pub fn resolve(&self, input: &str) -> &str {
        match self.matched_rule(input) {
            Some(rule) => {
                debug!(rule = %rule.name, "Reply rule matched");
                &rule.response
            }
            None => {
                debug!("No reply rule matched, using fallback");
                &self.fallback
            }
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ReplyResolver {
    fn default() -> Self {
        Self::new(builtin_rules(), FALLBACK_REPLY)
    }
}

/// The built-in rule table, in evaluation order.
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "password-reset",
            Trigger::Contains("password reset".into()),
            PASSWORD_RESET_REPLY,
        ),
        Rule::new(
            "software-request",
            Trigger::ContainsAny(vec!["software".into(), "install".into()]),
            SOFTWARE_REQUEST_REPLY,
        ),
        Rule::new(
            "vpn",
            Trigger::ContainsAny(vec!["vpn".into(), "remote".into()]),
            VPN_REPLY,
        ),
    ]
}

static BUILTIN: LazyLock<ReplyResolver> = LazyLock::new(ReplyResolver::default);

/// Resolve against the built-in table.
pub fn resolve(input: &str) -> &'static str {
    BUILTIN.resolve(input)
}
