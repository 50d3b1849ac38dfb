//! Configuration for the helpdesk.
//!
//! Loaded from a JSON file; every field has a default so a missing or
//! partial file still produces a working chat.

use crate::contact_center::ContactCenterConfig;
use crate::resolver::{builtin_rules, ReplyResolver, Rule, Trigger, FALLBACK_REPLY};
use crate::session::{SessionOptions, SUPPORT_NAME, WELCOME_MESSAGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the config file and logs.
pub const HELPDESK_DIR: &str = ".helpdesk";

/// Config file name inside [`HELPDESK_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Window title shown in the header.
    #[serde(default = "default_title")]
    pub title: String,

    /// Sender name for support-side messages.
    #[serde(default = "default_support_name")]
    pub support_name: String,

    /// First message of every session.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Overrides the directory lookup for the user's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Reply rules in evaluation order. Empty means the built-in table.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Reply used when no rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Contact-center instance, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_center: Option<ContactCenterConfig>,
}

fn default_title() -> String {
    "AnyState IT Support".into()
}

fn default_support_name() -> String {
    SUPPORT_NAME.into()
}

fn default_welcome_message() -> String {
    WELCOME_MESSAGE.into()
}

/// A configured reply rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    /// Phrases; any one of them triggers the rule.
    pub keywords: Vec<String>,
    pub response: String,
}

impl Config {
    /// Default config path under `base`.
    pub fn default_path(base: &Path) -> PathBuf {
        base.join(HELPDESK_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, using defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Build the reply resolver described by this config.
    pub fn resolver(&self) -> Result<ReplyResolver, ConfigError> {
        let fallback = self.fallback.as_deref().unwrap_or(FALLBACK_REPLY);
        if fallback.trim().is_empty() {
            return Err(ConfigError::Invalid("fallback reply is empty".into()));
        }
        if self.rules.is_empty() {
            return Ok(ReplyResolver::new(builtin_rules(), fallback));
        }

        let rules = self
            .rules
            .iter()
            .map(RuleConfig::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReplyResolver::new(rules, fallback))
    }

    /// Session options for a user with the given display name.
    pub fn session_options(
        &self,
        display_name: impl Into<String>,
    ) -> Result<SessionOptions, ConfigError> {
        Ok(SessionOptions {
            display_name: display_name.into(),
            support_name: self.support_name.clone(),
            welcome_message: self.welcome_message.clone(),
            resolver: self.resolver()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            support_name: default_support_name(),
            welcome_message: default_welcome_message(),
            display_name: None,
            rules: Vec::new(),
            fallback: None,
            contact_center: None,
        }
    }
}

impl RuleConfig {
    fn to_rule(&self) -> Result<Rule, ConfigError> {
        if self.keywords.is_empty() || self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "rule '{}' needs non-empty keywords",
                self.name
            )));
        }
        if self.response.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "rule '{}' has an empty response",
                self.name
            )));
        }
        Ok(Rule::new(
            self.name.clone(),
            Trigger::from_keywords(&self.keywords),
            self.response.clone(),
        ))
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Config parsed but describes something unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
