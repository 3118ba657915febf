use serde::{Deserialize, Serialize};

/// Application role.
///
/// The set is closed on purpose. Every role the backend can issue appears
/// here, permission tables match on it exhaustively, and adding a variant
/// forces every table to state what the new role may do. Serde names are the
/// exact strings the backend puts in the login payload.
///
/// An unknown role string fails deserialization of the whole payload. Version
/// skew between backend and client is a deployment fault and must surface
/// loudly, not degrade into silently missing permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform operator. Works across companies.
    #[serde(rename = "ADMIN_SISTEMA")]
    SystemAdmin,

    /// Administrator of a single company.
    #[serde(rename = "ADMIN_EMPRESA")]
    CompanyAdmin,

    /// Runs farms: lots, harvests, field activities.
    #[serde(rename = "PRODUCTOR")]
    Producer,

    /// Packing-plant staff: receptions, classification, labelling.
    #[serde(rename = "OPERARIO_PLANTA")]
    PlantOperator,

    /// Dispatch staff: shipments and transit events.
    #[serde(rename = "OPERARIO_LOGISTICA")]
    LogisticsOperator,

    /// Read-only access for certification audits.
    #[serde(rename = "AUDITOR")]
    Auditor,
}

impl Role {
    /// Every role, broadest first.
    pub const ALL: [Role; 6] = [
        Role::SystemAdmin,
        Role::CompanyAdmin,
        Role::Producer,
        Role::PlantOperator,
        Role::LogisticsOperator,
        Role::Auditor,
    ];

    /// The wire name the backend uses for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SystemAdmin => "ADMIN_SISTEMA",
            Role::CompanyAdmin => "ADMIN_EMPRESA",
            Role::Producer => "PRODUCTOR",
            Role::PlantOperator => "OPERARIO_PLANTA",
            Role::LogisticsOperator => "OPERARIO_LOGISTICA",
            Role::Auditor => "AUDITOR",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));

            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        let result: Result<Role, _> = serde_json::from_str("\"SUPERADMIN\"");
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_the_wire_name() {
        assert_eq!(Role::PlantOperator.to_string(), "OPERARIO_PLANTA");
    }
}
