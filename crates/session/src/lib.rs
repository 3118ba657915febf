//! `agrotrace-session` — authentication lifecycle and credential persistence.
//!
//! The [`SessionStore`] is the single owner of "who is signed in". It talks
//! to the backend through an injected [`CredentialTransport`], persists
//! credentials through an injected [`CredentialVault`], and reacts to remote
//! invalidation through the signal bus (see [`spawn_expiry_listener`]).
//!
//! Everything downstream consumes it read-only: permission checks through
//! `agrotrace_access::PrincipalSource`, guards through
//! [`SessionStore::snapshot`].

pub mod json_vault;
pub mod listener;
pub mod messages;
pub mod store;
pub mod token;
pub mod transport;
pub mod vault;

pub use json_vault::JsonFileVault;
pub use listener::{ExpiryListener, spawn_expiry_listener};
pub use store::{SessionPhase, SessionSnapshot, SessionStore};
pub use token::{AccessToken, RefreshToken};
pub use transport::{
    AuthPayload, CredentialTransport, LoginOutcome, LoginRequest, TransportError,
};
pub use vault::{CredentialVault, InMemoryVault, StoredCredentials, VaultError};
