use std::sync::Arc;

use crate::{Action, ActionSet, Module, Principal, Role, matrix};

/// Where permission checks find the current principal.
///
/// Implemented by the session store in the running app; tests inject a fixed
/// principal. `None` means nobody is signed in, and every check denies.
pub trait PrincipalSource: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;

    /// The role checks evaluate against. Separate so callers that only need
    /// the role do not clone the whole principal.
    fn current_role(&self) -> Option<Role> {
        self.current_principal().map(|p| p.role)
    }
}

impl<T> PrincipalSource for Arc<T>
where
    T: PrincipalSource + ?Sized,
{
    fn current_principal(&self) -> Option<Principal> {
        (**self).current_principal()
    }

    fn current_role(&self) -> Option<Role> {
        (**self).current_role()
    }
}

/// Answers permission questions for whoever is signed in right now.
///
/// Stateless apart from the injected source. Every check re-reads the role,
/// so a check made after logout or session expiry denies without any cache to
/// invalidate. Nothing here is an error: unauthenticated simply answers
/// `false` (or the empty set).
#[derive(Debug, Clone)]
pub struct PermissionEngine<P> {
    source: P,
}

impl<P> PermissionEngine<P>
where
    P: PrincipalSource,
{
    pub fn new(source: P) -> Self {
        Self { source }
    }

    /// Whether the current principal holds `action` on `module`.
    pub fn has_permission(&self, module: Module, action: Action) -> bool {
        self.with_role(|role| matrix::permissions_for(module, role).contains(action))
    }

    /// Whether the current principal may enter `module` at all.
    pub fn can_access(&self, module: Module) -> bool {
        self.with_role(|role| matrix::roles_with_access(module).contains(&role))
    }

    pub fn can_create(&self, module: Module) -> bool {
        self.has_permission(module, Action::Create)
    }

    pub fn can_read(&self, module: Module) -> bool {
        self.has_permission(module, Action::Read)
    }

    pub fn can_update(&self, module: Module) -> bool {
        self.has_permission(module, Action::Update)
    }

    pub fn can_delete(&self, module: Module) -> bool {
        self.has_permission(module, Action::Delete)
    }

    /// The current principal's actions on `module`, empty when signed out.
    pub fn module_permissions(&self, module: Module) -> ActionSet {
        match self.source.current_role() {
            Some(role) => matrix::permissions_for(module, role),
            None => ActionSet::NONE,
        }
    }

    /// True only for the platform-operator role.
    pub fn is_admin(&self) -> bool {
        self.with_role(|role| role == Role::SystemAdmin)
    }

    /// Whether the current role is one of `roles`.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.with_role(|role| roles.contains(&role))
    }

    /// Every module the current principal may enter, in navigation order.
    pub fn accessible_modules(&self) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|module| self.can_access(*module))
            .collect()
    }

    fn with_role(&self, check: impl FnOnce(Role) -> bool) -> bool {
        self.source.current_role().is_some_and(check)
    }
}

#[cfg(test)]
mod tests {
    use agrotrace_core::{CompanyId, UserId};

    use super::*;

    struct StaticSource(Option<Principal>);

    impl PrincipalSource for StaticSource {
        fn current_principal(&self) -> Option<Principal> {
            self.0.clone()
        }
    }

    fn engine_for(role: Role) -> PermissionEngine<StaticSource> {
        PermissionEngine::new(StaticSource(Some(Principal {
            id: UserId::new(),
            email: "test@example.com".into(),
            display_name: "Test".into(),
            role,
            company_id: CompanyId::new(),
            active: true,
        })))
    }

    fn anonymous() -> PermissionEngine<StaticSource> {
        PermissionEngine::new(StaticSource(None))
    }

    #[test]
    fn anonymous_is_denied_everything() {
        let engine = anonymous();

        for module in Module::ALL {
            assert!(!engine.can_access(module));
            assert!(engine.module_permissions(module).is_empty());
            for action in Action::ALL {
                assert!(!engine.has_permission(module, action));
            }
        }
        assert!(engine.accessible_modules().is_empty());
        assert!(!engine.is_admin());
        assert!(!engine.has_role(&Role::ALL));
    }

    #[test]
    fn producer_on_lots_matches_the_table() {
        let engine = engine_for(Role::Producer);

        assert!(engine.can_access(Module::Lots));
        assert!(engine.can_create(Module::Lots));
        assert!(engine.can_read(Module::Lots));
        assert!(engine.can_update(Module::Lots));
        assert!(!engine.can_delete(Module::Lots));
    }

    #[test]
    fn module_permissions_mirror_the_table() {
        let engine = engine_for(Role::PlantOperator);

        assert_eq!(
            engine.module_permissions(Module::Labels),
            ActionSet::of(&[Action::Create, Action::Read, Action::Update])
        );
        assert_eq!(engine.module_permissions(Module::Users), ActionSet::NONE);
    }

    #[test]
    fn auditor_sees_everything_except_user_management() {
        let engine = engine_for(Role::Auditor);

        let modules = engine.accessible_modules();
        assert_eq!(modules.len(), Module::ALL.len() - 1);
        assert!(!modules.contains(&Module::Users));
        assert!(!engine.can_access(Module::Users));
    }

    #[test]
    fn only_the_system_admin_counts_as_admin() {
        assert!(engine_for(Role::SystemAdmin).is_admin());
        assert!(!engine_for(Role::CompanyAdmin).is_admin());
        assert!(!engine_for(Role::Producer).is_admin());
    }

    #[test]
    fn has_role_is_membership_in_the_given_set() {
        let engine = engine_for(Role::Producer);

        assert!(engine.has_role(&[Role::Auditor, Role::Producer]));
        assert!(!engine.has_role(&[Role::Auditor, Role::PlantOperator]));
        assert!(!engine.has_role(&[]));
    }

    #[test]
    fn engine_shares_a_source_behind_arc() {
        let source = Arc::new(StaticSource(Some(Principal {
            id: UserId::new(),
            email: "shared@example.com".into(),
            display_name: "Shared".into(),
            role: Role::Auditor,
            company_id: CompanyId::new(),
            active: true,
        })));

        let engine = PermissionEngine::new(Arc::clone(&source));
        assert!(engine.can_read(Module::Traceability));
    }
}
