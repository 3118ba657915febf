//! The role/module permission tables.
//!
//! Two tables, one question each:
//!
//! - [`permissions_for`]: which CRUD actions a role holds on a module.
//! - [`roles_with_access`]: which roles may enter a module at all.
//!
//! Access is deliberately broader than CRUD. The dashboard, for instance, is
//! visible to every role yet grants no CRUD capability on anything. The
//! reverse must never hold: a role with actions on a module always appears in
//! that module's access list (checked by property tests below).
//!
//! Every match is exhaustive and wildcard-free. Adding a role or a module
//! will not compile until each table states an explicit answer for it.
//! Company scoping is not decided here: these tables answer "may this role",
//! the backend narrows results to the caller's company.

use crate::{Action, ActionSet, Module, Role};

const NONE: ActionSet = ActionSet::NONE;
const R: ActionSet = ActionSet::of(&[Action::Read]);
const CR: ActionSet = ActionSet::of(&[Action::Create, Action::Read]);
const CRU: ActionSet = ActionSet::of(&[Action::Create, Action::Read, Action::Update]);
const CRUD: ActionSet =
    ActionSet::of(&[Action::Create, Action::Read, Action::Update, Action::Delete]);

/// CRUD actions `role` holds on `module`.
///
/// - No IO
/// - No panics
/// - Total: defined for every (module, role) pair
pub fn permissions_for(module: Module, role: Role) -> ActionSet {
    match module {
        Module::Dashboard => dashboard(role),
        Module::Farms => farms(role),
        Module::Lots => lots(role),
        Module::Harvests => harvests(role),
        Module::Certifications => certifications(role),
        Module::Activities => activities(role),
        Module::Receptions => receptions(role),
        Module::Classification => classification(role),
        Module::Labels => labels(role),
        Module::Pallets => pallets(role),
        Module::QualityControl => quality_control(role),
        Module::Shipments => shipments(role),
        Module::LogisticsEvents => logistics_events(role),
        Module::Documents => documents(role),
        Module::Traceability => traceability(role),
        Module::Users => users(role),
    }
}

/// Roles allowed to enter `module`.
///
/// Superset of the roles with actions there; may be strictly larger for
/// modules whose screens are informative rather than editable.
pub fn roles_with_access(module: Module) -> &'static [Role] {
    use Role::*;

    match module {
        Module::Dashboard => &Role::ALL,
        Module::Farms => &[SystemAdmin, CompanyAdmin, Producer, Auditor],
        Module::Lots => &Role::ALL,
        Module::Harvests => &[SystemAdmin, CompanyAdmin, Producer, PlantOperator, Auditor],
        Module::Certifications => &[SystemAdmin, CompanyAdmin, Producer, Auditor],
        Module::Activities => &[SystemAdmin, CompanyAdmin, Producer, Auditor],
        Module::Receptions => &[SystemAdmin, CompanyAdmin, Producer, PlantOperator, Auditor],
        Module::Classification => &[SystemAdmin, CompanyAdmin, PlantOperator, Auditor],
        Module::Labels => &[SystemAdmin, CompanyAdmin, PlantOperator, LogisticsOperator, Auditor],
        Module::Pallets => &[SystemAdmin, CompanyAdmin, PlantOperator, LogisticsOperator, Auditor],
        Module::QualityControl => &[SystemAdmin, CompanyAdmin, PlantOperator, Auditor],
        Module::Shipments => &Role::ALL,
        Module::LogisticsEvents => &[SystemAdmin, CompanyAdmin, LogisticsOperator, Auditor],
        Module::Documents => &Role::ALL,
        Module::Traceability => &Role::ALL,
        Module::Users => &[SystemAdmin, CompanyAdmin],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-cutting modules
// ─────────────────────────────────────────────────────────────────────────────

fn dashboard(role: Role) -> ActionSet {
    // Everyone lands here; the page adapts to the role. No CRUD surface.
    match role {
        Role::SystemAdmin
        | Role::CompanyAdmin
        | Role::Producer
        | Role::PlantOperator
        | Role::LogisticsOperator
        | Role::Auditor => NONE,
    }
}

fn documents(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin => CRUD,
        Role::CompanyAdmin => CRU,
        Role::Producer | Role::PlantOperator | Role::LogisticsOperator => CR,
        Role::Auditor => R,
    }
}

fn traceability(role: Role) -> ActionSet {
    // Derived view over the whole chain. Nobody edits it, not even admins.
    match role {
        Role::SystemAdmin
        | Role::CompanyAdmin
        | Role::Producer
        | Role::PlantOperator
        | Role::LogisticsOperator
        | Role::Auditor => R,
    }
}

fn users(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer | Role::PlantOperator | Role::LogisticsOperator | Role::Auditor => NONE,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field modules
// ─────────────────────────────────────────────────────────────────────────────

fn farms(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => CRU,
        Role::PlantOperator | Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

fn lots(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => CRU,
        Role::PlantOperator | Role::LogisticsOperator | Role::Auditor => R,
    }
}

fn harvests(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => CRU,
        Role::PlantOperator => R,
        Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

fn certifications(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => CRU,
        Role::PlantOperator | Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

fn activities(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => CRU,
        Role::PlantOperator | Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plant modules
// ─────────────────────────────────────────────────────────────────────────────

fn receptions(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => R,
        Role::PlantOperator => CRU,
        Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

fn classification(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => NONE,
        Role::PlantOperator => CRU,
        Role::LogisticsOperator => NONE,
        Role::Auditor => R,
    }
}

fn labels(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => NONE,
        Role::PlantOperator => CRU,
        Role::LogisticsOperator => R,
        Role::Auditor => R,
    }
}

fn pallets(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer => NONE,
        Role::PlantOperator => CRU,
        Role::LogisticsOperator => R,
        Role::Auditor => R,
    }
}

fn quality_control(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer | Role::LogisticsOperator => NONE,
        Role::PlantOperator => CRU,
        Role::Auditor => R,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logistics modules
// ─────────────────────────────────────────────────────────────────────────────

fn shipments(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer | Role::PlantOperator => R,
        Role::LogisticsOperator => CRU,
        Role::Auditor => R,
    }
}

fn logistics_events(role: Role) -> ActionSet {
    match role {
        Role::SystemAdmin | Role::CompanyAdmin => CRUD,
        Role::Producer | Role::PlantOperator => NONE,
        Role::LogisticsOperator => CRU,
        Role::Auditor => R,
    }
}
