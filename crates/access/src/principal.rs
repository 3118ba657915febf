use serde::{Deserialize, Serialize};

use agrotrace_core::{CompanyId, UserId};

use crate::Role;

/// A signed-in user as authorization sees them.
///
/// Owned by the session layer once authenticated; permission checks read it
/// through [`PrincipalSource`](crate::PrincipalSource) instead of holding a
/// copy. The struct round-trips through serde because it is persisted next to
/// the credentials, so checks keep working after a restart without a network
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub company_id: CompanyId,
    /// Deactivated accounts still authenticate against cached credentials;
    /// the backend is the one that locks them out.
    pub active: bool,
}
