//! The path-to-module table.
//!
//! Paths are matched exact-first, then by longest prefix on a segment
//! boundary, so `/lots/42/edit` resolves like `/lots` while `/lotsx` resolves
//! to nothing. The root path is never a prefix; it would otherwise shadow
//! every route.

use agrotrace_access::Module;

/// Where unauthenticated navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where denied navigations are sent. Every role may land here.
pub const DEFAULT_LANDING: &str = "/dashboard";

/// Canonical route for each module, then deep routes that map to a different
/// module than their parent. Matching ignores order; [`path_for`] relies on
/// the canonical entry coming first.
pub const ROUTES: &[(&str, Module)] = &[
    ("/dashboard", Module::Dashboard),
    ("/farms", Module::Farms),
    ("/lots", Module::Lots),
    ("/harvests", Module::Harvests),
    ("/certifications", Module::Certifications),
    ("/activities", Module::Activities),
    ("/receptions", Module::Receptions),
    ("/classification", Module::Classification),
    ("/labels", Module::Labels),
    ("/pallets", Module::Pallets),
    ("/quality-control", Module::QualityControl),
    ("/shipments", Module::Shipments),
    ("/logistics", Module::LogisticsEvents),
    ("/documents", Module::Documents),
    ("/traceability", Module::Traceability),
    ("/usuarios", Module::Users),
    // Cross-module view living under the lots tree.
    ("/lots/traceability", Module::Traceability),
];

/// Resolve a navigation path to the module that governs it.
///
/// `None` means the path is not module-governed; the guard lets those pass
/// once the session itself checks out.
pub fn resolve(path: &str) -> Option<Module> {
    if let Some((_, module)) = ROUTES.iter().find(|(route, _)| *route == path) {
        return Some(*module);
    }

    ROUTES
        .iter()
        .filter(|(route, _)| {
            path.strip_prefix(route)
                .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(route, _)| route.len())
        .map(|(_, module)| *module)
}

/// The canonical path for a module, e.g. for building navigation menus from
/// the modules a role may access.
pub fn path_for(module: Module) -> &'static str {
    // Canonical entries precede the deep routes, so the first hit is the
    // canonical one.
    ROUTES
        .iter()
        .find(|(_, m)| *m == module)
        .map(|(route, _)| *route)
        .unwrap_or(DEFAULT_LANDING)
}
