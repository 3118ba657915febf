//! Plain-text renderings of what a role may see and do.

use std::fmt::Write as _;

use agrotrace_access::{Action, Module, Role, permissions_for, roles_with_access};
use agrotrace_routing::path_for;

/// One line per module with `crud` marks, `-` for a missing action.
pub fn permissions_table(role: Role) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "permissions for {role}:");

    for module in Module::ALL {
        let granted = permissions_for(module, role);
        let mut marks = String::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            marks.push(if granted.contains(action) {
                match action {
                    Action::Create => 'c',
                    Action::Read => 'r',
                    Action::Update => 'u',
                    Action::Delete => 'd',
                }
            } else {
                '-'
            });
        }
        let _ = writeln!(out, "  {:<18} {marks}", module.as_str());
    }
    out
}

/// The navigation entries a role gets, as canonical paths.
pub fn navigation_menu(role: Role) -> String {
    Module::ALL
        .into_iter()
        .filter(|module| roles_with_access(*module).contains(&role))
        .map(path_for)
        .collect::<Vec<_>>()
        .join("  ")
}
