//! Signal payloads carried by the bus.

use serde::{Deserialize, Serialize};

/// Notice that the active session is no longer valid on the backend.
///
/// Emitted by the transport layer when a request comes back 401 and the
/// credential could not be refreshed. Carries no payload: everything the
/// session store needs to react, it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInvalidated;
