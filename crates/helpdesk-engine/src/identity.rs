//! Display name lookup for the signed-in user.
//!
//! The directory is consulted first; any failure falls back to the local
//! account name so the chat always has someone to attribute messages to.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Account name used when the environment names nobody.
const UNKNOWN_ACCOUNT: &str = "user";

/// Source of a human-readable display name.
pub trait Directory {
    /// Look up the current user's display name.
    fn display_name(&self) -> Result<String, IdentityError>;
}

/// Reads the GECOS field of the current account from a passwd file.
#[derive(Debug, Clone)]
pub struct PasswdDirectory {
    path: PathBuf,
    account: String,
}

impl PasswdDirectory {
    /// Look up the current account in `/etc/passwd`.
    pub fn system() -> Self {
        Self::new("/etc/passwd", local_account_name())
    }

    pub fn new(path: impl Into<PathBuf>, account: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            account: account.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Directory for PasswdDirectory {
    fn display_name(&self) -> Result<String, IdentityError> {
        let content = std::fs::read_to_string(&self.path)?;
        let entry = content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(|line| line.split(':').collect::<Vec<_>>())
            .find(|fields| fields.first() == Some(&self.account.as_str()))
            .ok_or_else(|| IdentityError::UnknownAccount(self.account.clone()))?;

        // name:password:uid:gid:gecos:home:shell
        let full_name = entry
            .get(4)
            .and_then(|gecos| gecos.split(',').next())
            .map(str::trim)
            .unwrap_or_default();
        if full_name.is_empty() {
            return Err(IdentityError::NoDisplayName(self.account.clone()));
        }
        Ok(full_name.to_string())
    }
}

/// Name of the local OS account.
pub fn local_account_name() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ACCOUNT.to_string())
}

/// Pick the name to show for the user.
///
/// A configured name wins; otherwise the directory is asked, and on any
/// error the local account name is used.
pub fn resolve_display_name(configured: Option<&str>, directory: &dyn Directory) -> String {
    if let Some(name) = configured.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match directory.display_name() {
        Ok(name) => name,
        Err(e) => {
            let fallback = local_account_name();
            warn!(error = %e, fallback = %fallback, "Directory lookup failed");
            fallback
        }
    }
}

/// Errors from directory lookups.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// I/O error reading the directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Account missing from the directory.
    #[error("Account not found: {0}")]
    UnknownAccount(String),

    /// Account has no display name recorded.
    #[error("No display name for account: {0}")]
    NoDisplayName(String),
}
