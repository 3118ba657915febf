//! Credential persistence.
//!
//! One logical record holding the access token, the refresh token, and the
//! principal. The record is written and cleared as a unit: a vault can hold
//! the whole set or nothing, never a torn subset. Readers treat anything
//! unreadable the same as absent, so a corrupt store degrades to "signed
//! out", never to a crash at startup.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agrotrace_access::Principal;

use crate::token::{AccessToken, RefreshToken};

/// The persisted credential set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub principal: Principal,
    /// When this set was written. Informational only; nothing expires on the
    /// client side.
    pub persisted_at: DateTime<Utc>,
}

impl StoredCredentials {
    pub fn new(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        principal: Principal,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            principal,
            persisted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault io: {0}")]
    Io(#[from] std::io::Error),

    #[error("vault encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("no usable data directory on this platform")]
    NoDataDir,

    #[error("vault lock poisoned")]
    Poisoned,
}

/// Where the session store keeps credentials between processes.
///
/// The session store is the only writer. Reads happen on every protected
/// navigation, so `load` must stay cheap and synchronous.
pub trait CredentialVault: Send + Sync {
    /// The complete persisted set, or `None` when absent or unreadable.
    fn load(&self) -> Option<StoredCredentials>;

    fn store(&self, credentials: &StoredCredentials) -> Result<(), VaultError>;

    /// Removing an already empty vault is a success.
    fn clear(&self) -> Result<(), VaultError>;
}

/// Vault for tests and ephemeral sessions. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    slot: Mutex<Option<StoredCredentials>>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already holding a credential set, as if a previous process
    /// had signed in.
    pub fn holding(credentials: StoredCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialVault for InMemoryVault {
    fn load(&self) -> Option<StoredCredentials> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn store(&self, credentials: &StoredCredentials) -> Result<(), VaultError> {
        let mut slot = self.slot.lock().map_err(|_| VaultError::Poisoned)?;
        *slot = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        let mut slot = self.slot.lock().map_err(|_| VaultError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}
