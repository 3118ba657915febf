use serde::{Deserialize, Serialize};

/// A functional area of the application.
///
/// Closed for the same reason [`Role`](crate::Role) is: permission tables
/// match on it exhaustively, so a new screen cannot ship without an explicit
/// row in every table. The serde names double as the stable identifiers used
/// in logs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    Dashboard,
    Farms,
    Lots,
    Harvests,
    Certifications,
    Activities,
    Receptions,
    Classification,
    Labels,
    Pallets,
    QualityControl,
    Shipments,
    LogisticsEvents,
    Documents,
    Traceability,
    Users,
}

impl Module {
    pub const ALL: [Module; 16] = [
        Module::Dashboard,
        Module::Farms,
        Module::Lots,
        Module::Harvests,
        Module::Certifications,
        Module::Activities,
        Module::Receptions,
        Module::Classification,
        Module::Labels,
        Module::Pallets,
        Module::QualityControl,
        Module::Shipments,
        Module::LogisticsEvents,
        Module::Documents,
        Module::Traceability,
        Module::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Farms => "farms",
            Module::Lots => "lots",
            Module::Harvests => "harvests",
            Module::Certifications => "certifications",
            Module::Activities => "activities",
            Module::Receptions => "receptions",
            Module::Classification => "classification",
            Module::Labels => "labels",
            Module::Pallets => "pallets",
            Module::QualityControl => "quality-control",
            Module::Shipments => "shipments",
            Module::LogisticsEvents => "logistics-events",
            Module::Documents => "documents",
            Module::Traceability => "traceability",
            Module::Users => "users",
        }
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
