//! The navigation decision function.
//!
//! Authorization denial is a redirect, never an error; the page layer only
//! needs the [`RouteDecision`] value. Each decision is computed from one
//! session view so it cannot be torn by a concurrent transition.

use std::sync::Arc;

use agrotrace_access::{Module, Role, roles_with_access};
use agrotrace_session::{SessionSnapshot, SessionStore};

use crate::route_map;

/// Read access to the current session, as the guard needs it.
///
/// Implementations return a self-consistent view; the store's own
/// implementation also re-derives from the vault first, so storage cleared
/// out of band signs the session out at the next navigation.
pub trait SessionAccess: Send + Sync {
    fn session(&self) -> SessionSnapshot;
}

impl SessionAccess for SessionStore {
    fn session(&self) -> SessionSnapshot {
        self.check_auth();
        self.snapshot()
    }
}

impl<S> SessionAccess for Arc<S>
where
    S: SessionAccess + ?Sized,
{
    fn session(&self) -> SessionSnapshot {
        (**self).session()
    }
}

/// A navigation target plus its per-route requirements.
///
/// Most routes declare nothing and get the module check derived from their
/// path. A route may instead declare an explicit role list or module, which
/// then replaces the path-derived check entirely, tightening or relaxing it.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub path: &'a str,
    pub required_roles: Option<&'a [Role]>,
    pub required_module: Option<Module>,
}

impl<'a> RouteRequest<'a> {
    pub fn to(path: &'a str) -> Self {
        Self {
            path,
            required_roles: None,
            required_module: None,
        }
    }

    pub fn requiring_roles(self, roles: &'a [Role]) -> Self {
        Self {
            required_roles: Some(roles),
            ..self
        }
    }

    pub fn requiring_module(self, module: Module) -> Self {
        Self {
            required_module: Some(module),
            ..self
        }
    }
}

/// What the page layer should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Send to [`route_map::LOGIN_PATH`], keeping the origin so the user
    /// returns there after re-authenticating, and the expiry flag so the
    /// login page shows the right banner.
    ToLogin {
        origin: String,
        session_expired: bool,
    },
    /// Silent denial; send to [`route_map::DEFAULT_LANDING`].
    ToDefault,
}

/// Evaluates navigations against the session it was built over.
#[derive(Debug, Clone)]
pub struct RouteGuard<S> {
    session: S,
}

impl<S: SessionAccess> RouteGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn decide(&self, request: &RouteRequest<'_>) -> RouteDecision {
        let session = self.session.session();

        if !session.is_authenticated() || session.session_expired {
            tracing::debug!(
                path = request.path,
                session_expired = session.session_expired,
                "navigation needs authentication"
            );
            return RouteDecision::ToLogin {
                origin: request.path.to_string(),
                session_expired: session.session_expired,
            };
        }

        let Some(role) = session.principal.as_ref().map(|p| p.role) else {
            return RouteDecision::ToLogin {
                origin: request.path.to_string(),
                session_expired: session.session_expired,
            };
        };

        if let Some(roles) = request.required_roles {
            if !roles.contains(&role) {
                return self.deny(request.path, role, "role not in the route's list");
            }
        }
        if let Some(module) = request.required_module {
            if !role_may_access(role, module) {
                return self.deny(request.path, role, "declared module denied");
            }
        }

        // The path-derived check applies only to routes that declare nothing
        // themselves; an explicit list or module replaces it.
        if request.required_roles.is_none() && request.required_module.is_none() {
            if let Some(module) = route_map::resolve(request.path) {
                if !role_may_access(role, module) {
                    return self.deny(request.path, role, "path-derived module denied");
                }
            }
        }

        RouteDecision::Allow
    }

    fn deny(&self, path: &str, role: Role, reason: &'static str) -> RouteDecision {
        tracing::debug!(path, %role, reason, "navigation denied");
        RouteDecision::ToDefault
    }
}

fn role_may_access(role: Role, module: Module) -> bool {
    roles_with_access(module).contains(&role)
}
