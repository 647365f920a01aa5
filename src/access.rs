//! Shared-passphrase access gate.
//!
//! This keeps casual users out of the agent console. It is not a security
//! boundary: the passphrase is shared by every agent and stored in plain
//! configuration.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::AccessConfig;

/// Errors from the access gate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    /// The passphrase did not match.
    #[error("access denied: wrong passphrase")]
    Denied,
}

/// Proof that the gate was passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSession {
    opened_at: DateTime<Utc>,
}

impl AccessSession {
    /// When the session was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

/// Checks a passphrase and opens a session.
#[derive(Clone)]
pub struct AccessGate {
    passphrase: Option<String>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("open", &self.is_open())
            .finish()
    }
}

impl AccessGate {
    /// Gate guarded by `passphrase`; `None` (or blank) leaves it open.
    pub fn new(passphrase: Option<String>) -> Self {
        Self {
            passphrase: passphrase.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Gate from the `[access]` configuration section.
    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.passphrase.clone())
    }

    /// True when no passphrase is configured.
    pub fn is_open(&self) -> bool {
        self.passphrase.is_none()
    }

    /// Try to open a session.
    ///
    /// # Errors
    ///
    /// [`AccessError::Denied`] when a passphrase is configured and
    /// `attempt` does not match it exactly.
    pub fn unlock(&self, attempt: &str) -> Result<AccessSession, AccessError> {
        match &self.passphrase {
            Some(expected) if expected != attempt => {
                warn!("access denied");
                Err(AccessError::Denied)
            }
            _ => {
                info!("access granted");
                Ok(AccessSession {
                    opened_at: Utc::now(),
                })
            }
        }
    }
}
