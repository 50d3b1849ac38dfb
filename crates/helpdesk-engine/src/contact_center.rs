//! Contact-center client stand-ins.
//!
//! The clients are built from configuration at startup and kept for the
//! session, but nothing is ever sent through them: live-agent and callback
//! traffic is simulated by the session.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Where the contact-center instance lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCenterConfig {
    /// Service region, e.g. `us-east-1`.
    pub region: String,
    /// Instance identifier (a UUID).
    pub instance_id: String,
}

/// Validated handles for the contact and participant services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCenterClients {
    region: String,
    instance_id: Uuid,
}

impl ContactCenterClients {
    /// Build the clients. No I/O is performed.
    pub fn connect(config: &ContactCenterConfig) -> Result<Self, ContactCenterError> {
        let region = config.region.trim();
        if region.is_empty() {
            return Err(ContactCenterError::MissingRegion);
        }
        if !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ContactCenterError::InvalidRegion(region.to_string()));
        }
        let instance_id = Uuid::parse_str(config.instance_id.trim())
            .map_err(|e| ContactCenterError::InvalidInstanceId(e.to_string()))?;

        info!(region = %region, instance = %instance_id, "Contact center clients ready");
        Ok(Self {
            region: region.to_string(),
            instance_id,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

/// Errors building the contact-center clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactCenterError {
    #[error("no region configured")]
    MissingRegion,

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid instance id: {0}")]
    InvalidInstanceId(String),
}
