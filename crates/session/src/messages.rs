//! Fixed user-facing strings.
//!
//! Spanish, matching the messages the backend itself sends. Kept in one place
//! so the store and the tests agree on the exact wording.

/// Shown when a login fails and neither the backend nor the transport
/// supplied a reason.
pub const LOGIN_FALLBACK: &str = "Error al iniciar sesión";

/// Shown on the login page after the session was invalidated remotely.
pub const SESSION_EXPIRED: &str = "Tu sesión ha expirado. Inicia sesión nuevamente.";
