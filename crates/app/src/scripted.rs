//! A canned backend for the demo binary.
//!
//! Accepts exactly one email/password pair and mints a fresh token set per
//! accepted login, which is enough to walk the whole session lifecycle
//! without a server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use agrotrace_access::Principal;
use agrotrace_session::{
    AccessToken, AuthPayload, CredentialTransport, LoginOutcome, LoginRequest, RefreshToken,
    TransportError,
};

pub struct DemoTransport {
    email: String,
    password: String,
    principal: Principal,
    logins: AtomicU64,
}

impl DemoTransport {
    pub fn accepting(
        email: impl Into<String>,
        password: impl Into<String>,
        principal: Principal,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            principal,
            logins: AtomicU64::new(0),
        }
    }

    fn mint(&self) -> AuthPayload {
        let n = self.logins.fetch_add(1, Ordering::Relaxed) + 1;
        AuthPayload {
            access_token: AccessToken::new(format!("demo-access-{n}")),
            refresh_token: RefreshToken::new(format!("demo-refresh-{n}")),
            principal: self.principal.clone(),
        }
    }
}

#[async_trait]
impl CredentialTransport for DemoTransport {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, TransportError> {
        // A little wire latency keeps the loading phase observable.
        tokio::time::sleep(Duration::from_millis(120)).await;

        if request.email == self.email && request.password == self.password {
            Ok(LoginOutcome::Accepted(self.mint()))
        } else {
            Ok(LoginOutcome::Rejected {
                message: Some("Credenciales inválidas".to_string()),
            })
        }
    }

    async fn logout(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
