//! `agrotrace-routing` — navigation decisions over the session and the
//! permission matrix.
//!
//! The page layer hands every navigation to [`RouteGuard::decide`] and acts
//! on the returned [`RouteDecision`]; no authorization logic lives outside
//! this call.

pub mod guard;
pub mod route_map;

pub use guard::{RouteDecision, RouteGuard, RouteRequest, SessionAccess};
pub use route_map::{DEFAULT_LANDING, LOGIN_PATH, ROUTES, path_for, resolve};
