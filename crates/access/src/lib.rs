//! agrotrace-access — who may do what, answered without IO.
//!
//! Roles and modules are closed enums, the permission matrix is a total
//! function over them, and [`PermissionEngine`] evaluates checks against
//! whatever [`PrincipalSource`] is plugged in. Denial is always a value,
//! never an error: being refused an action is a normal answer here.

pub mod action;
pub mod engine;
pub mod matrix;
pub mod module;
pub mod principal;
pub mod role;

pub use action::{Action, ActionSet};
pub use engine::{PermissionEngine, PrincipalSource};
pub use matrix::{permissions_for, roles_with_access};
pub use module::Module;
pub use principal::Principal;
pub use role::Role;
