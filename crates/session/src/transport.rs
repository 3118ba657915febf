//! The seam between the session store and whatever talks to the backend.
//!
//! The store never constructs a transport; it receives one. Production wires
//! an HTTP client here, tests wire scripted fakes. Beyond `login`/`logout`
//! the transport has one more duty that is not expressed in this trait: when
//! it observes a backend rejection it attributes to an invalidated session,
//! it publishes [`SessionInvalidated`](agrotrace_events::SessionInvalidated)
//! on the signal bus instead of calling into the store directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agrotrace_access::Principal;

use crate::token::{AccessToken, RefreshToken};

/// Credentials as the login form collects them.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"\u{2022}\u{2022}\u{2022}")
            .finish()
    }
}

/// Everything a successful login carries. Field names follow the backend's
/// JSON, which is camelCase and calls the principal `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    #[serde(rename = "user")]
    pub principal: Principal,
}

/// How the backend answered a login request it actually processed.
///
/// A rejection is an answer, not an error: the request completed and the
/// backend said no, optionally with a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Accepted(AuthPayload),
    Rejected { message: Option<String> },
}

/// The request itself failed before the backend could answer.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// A failure with a message worth showing the user.
    #[error("{message}")]
    Failed { message: String },

    /// The backend could not be reached at all.
    #[error("backend unreachable")]
    Unreachable,
}

impl TransportError {
    /// The message to surface to the user, when the failure carries one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            TransportError::Failed { message } => Some(message),
            TransportError::Unreachable => None,
        }
    }
}

#[async_trait]
pub trait CredentialTransport: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, TransportError>;

    /// Best-effort server-side logout. The store clears local state whether
    /// or not this succeeds.
    async fn logout(&self) -> Result<(), TransportError>;
}
