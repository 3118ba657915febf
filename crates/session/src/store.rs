//! The session state machine.
//!
//! One store per process owns the credentials and the principal. Everything
//! else reads it: permission checks through
//! [`PrincipalSource`](agrotrace_access::PrincipalSource), guards and UI
//! through [`SessionStore::snapshot`].
//!
//! The awkward part of this state machine is what happens *around* the two
//! awaits in `login` and `logout`. A session-expiry signal may collapse the
//! store while a login is in flight, and a logout may race a login's
//! resolution. The rules, each tested below:
//!
//! - a login that resolves after a logout writes nothing and returns `false`
//!   (the logout generation counter detects this);
//! - a login that resolves after a newer login started writes nothing and
//!   returns `false` (the attempt counter detects this);
//! - a successful login always supersedes an expiry collapse that interleaved
//!   it (fresh credentials install, the expired flag clears);
//! - a failed login after an expiry collapse leaves the store collapsed: the
//!   failure path never touches `session_expired`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use agrotrace_access::{Principal, PrincipalSource, Role};

use crate::messages;
use crate::token::{AccessToken, RefreshToken};
use crate::transport::{CredentialTransport, LoginOutcome, LoginRequest};
use crate::vault::{CredentialVault, StoredCredentials};

/// Token and principal, present together or not at all.
///
/// Keeping them in one `Option` makes the "token without user" (and inverse)
/// states unrepresentable instead of merely checked.
#[derive(Debug, Clone)]
struct AuthenticatedSession {
    access_token: AccessToken,
    principal: Principal,
}

#[derive(Debug, Default)]
struct SessionState {
    auth: Option<AuthenticatedSession>,
    refresh_token: Option<RefreshToken>,
    loading: bool,
    session_expired: bool,
    error: Option<String>,
    /// Bumped by every `logout`; a login started before the bump discards
    /// its own resolution.
    logout_generation: u64,
    /// Bumped by every `login`; only the newest attempt may write results.
    login_attempt: u64,
}

/// Where the session currently stands. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    SessionExpired,
}

impl core::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Authenticating => "authenticating",
            SessionPhase::Authenticated => "authenticated",
            SessionPhase::SessionExpired => "session-expired",
        })
    }
}

/// A consistent view of the session at one instant.
///
/// Guards must base a whole decision on a single snapshot rather than asking
/// the store several questions in a row, so the answer cannot be torn by a
/// transition in between.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub principal: Option<Principal>,
    pub loading: bool,
    pub session_expired: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Credentials and principal travel together, so presence of both is the
    /// definition of authenticated, not a separately tracked flag.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.principal.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Authenticating
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else if self.session_expired {
            SessionPhase::SessionExpired
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// The session store. Construct one, share it behind an [`Arc`].
///
/// Collaborators are injected: the transport performs the network calls, the
/// vault persists credentials across processes. The store is the only writer
/// the vault ever sees.
pub struct SessionStore {
    state: RwLock<SessionState>,
    transport: Arc<dyn CredentialTransport>,
    vault: Arc<dyn CredentialVault>,
}

impl SessionStore {
    pub fn new(transport: Arc<dyn CredentialTransport>, vault: Arc<dyn CredentialVault>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            transport,
            vault,
        }
    }

    /// Restore a persisted session at process start. Returns whether one was
    /// found.
    pub fn hydrate(&self) -> bool {
        let restored = self.check_auth();
        tracing::info!(restored, "session hydrated from vault");
        restored
    }

    /// Authenticate against the backend. Returns whether the store ended up
    /// authenticated by *this* attempt.
    ///
    /// Every failure becomes state (`error` plus cleared credentials), never
    /// a propagated error. The vault is written only on success; a failed
    /// re-authentication leaves the previously persisted set alone.
    pub async fn login(&self, request: LoginRequest) -> bool {
        let (generation, attempt) = {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
            state.login_attempt += 1;
            (state.logout_generation, state.login_attempt)
        };

        let outcome = self.transport.login(&request).await;

        let mut state = self.write();
        if state.logout_generation != generation || state.login_attempt != attempt {
            // A logout or a newer login won the race. This resolution is
            // stale: it must not resurrect or overwrite anything.
            tracing::debug!("discarding stale login resolution");
            return false;
        }

        match outcome {
            Ok(LoginOutcome::Accepted(payload)) => {
                let stored = StoredCredentials::new(
                    payload.access_token.clone(),
                    payload.refresh_token.clone(),
                    payload.principal.clone(),
                );
                if let Err(err) = self.vault.store(&stored) {
                    tracing::warn!("could not persist credentials, session will not survive a restart: {err:?}");
                }

                tracing::info!(
                    user = %payload.principal.id,
                    role = %payload.principal.role,
                    "login succeeded"
                );

                state.refresh_token = Some(payload.refresh_token);
                state.auth = Some(AuthenticatedSession {
                    access_token: payload.access_token,
                    principal: payload.principal,
                });
                state.session_expired = false;
                state.error = None;
                state.loading = false;
                true
            }
            Ok(LoginOutcome::Rejected { message }) => {
                tracing::debug!("login rejected by backend");
                state.auth = None;
                state.refresh_token = None;
                state.error = Some(message.unwrap_or_else(|| messages::LOGIN_FALLBACK.to_string()));
                state.loading = false;
                false
            }
            Err(err) => {
                tracing::warn!("login transport failure: {err:?}");
                state.auth = None;
                state.refresh_token = None;
                state.error = Some(
                    err.user_message()
                        .unwrap_or(messages::LOGIN_FALLBACK)
                        .to_string(),
                );
                state.loading = false;
                false
            }
        }
    }

    /// Sign out. Always succeeds locally: the server call and the vault clear
    /// are best-effort, local state clears unconditionally.
    ///
    /// `session_expired` and `error` survive a logout on purpose; the login
    /// page still needs them for its banner.
    pub async fn logout(&self) {
        {
            let mut state = self.write();
            state.logout_generation += 1;
        }

        if let Err(err) = self.transport.logout().await {
            tracing::warn!("server-side logout failed, clearing local session anyway: {err:?}");
        }

        if let Err(err) = self.vault.clear() {
            tracing::warn!("could not clear stored credentials: {err:?}");
        }

        let mut state = self.write();
        state.auth = None;
        state.refresh_token = None;
        state.loading = false;
        tracing::info!("logged out");
    }

    /// Synchronously re-derive the authenticated state from the vault.
    ///
    /// Cheap enough to call on every protected navigation. Guards against
    /// storage changing out-of-band; it is not token verification. No writes
    /// leave the store: flags and the vault itself stay untouched.
    pub fn check_auth(&self) -> bool {
        match self.vault.load() {
            Some(stored) => {
                let mut state = self.write();
                state.refresh_token = Some(stored.refresh_token);
                state.auth = Some(AuthenticatedSession {
                    access_token: stored.access_token,
                    principal: stored.principal,
                });
                true
            }
            None => {
                let mut state = self.write();
                if state.auth.is_some() {
                    tracing::debug!("stored credentials gone, dropping in-memory session");
                }
                state.auth = None;
                state.refresh_token = None;
                false
            }
        }
    }

    /// Replace the principal while keeping the tokens, e.g. after a profile
    /// edit. Ignored (logged at debug) when nobody is signed in.
    pub fn set_user(&self, principal: Principal) {
        let mut state = self.write();
        let SessionState {
            auth, refresh_token, ..
        } = &mut *state;

        match (auth.as_mut(), refresh_token.as_ref()) {
            (Some(auth), Some(refresh)) => {
                auth.principal = principal;

                let stored = StoredCredentials::new(
                    auth.access_token.clone(),
                    refresh.clone(),
                    auth.principal.clone(),
                );
                if let Err(err) = self.vault.store(&stored) {
                    tracing::warn!("could not persist updated principal: {err:?}");
                }
                tracing::info!(user = %auth.principal.id, "principal replaced");
            }
            _ => {
                tracing::debug!("set_user ignored outside an authenticated session");
            }
        }
    }

    /// Collapse the session after the backend invalidated it remotely.
    ///
    /// Reached only through the expiry signal, never called by UI code.
    /// Idempotent: repeated signals for the same collapse return early and
    /// repeat no side effects.
    pub fn handle_session_expired(&self) {
        {
            let state = self.read();
            if state.session_expired && state.auth.is_none() && state.refresh_token.is_none() {
                return;
            }
        }

        if let Err(err) = self.vault.clear() {
            tracing::warn!("could not clear stored credentials on expiry: {err:?}");
        }

        let mut state = self.write();
        state.auth = None;
        state.refresh_token = None;
        state.session_expired = true;
        state.error = Some(messages::SESSION_EXPIRED.to_string());
        tracing::info!("session expired, credentials cleared");
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    pub fn clear_session_expired(&self) {
        self.write().session_expired = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            access_token: state.auth.as_ref().map(|a| a.access_token.clone()),
            refresh_token: state.refresh_token.clone(),
            principal: state.auth.as_ref().map(|a| a.principal.clone()),
            loading: state.loading,
            session_expired: state.session_expired,
            error: state.error.clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PrincipalSource for SessionStore {
    fn current_principal(&self) -> Option<Principal> {
        self.read().auth.as_ref().map(|a| a.principal.clone())
    }

    fn current_role(&self) -> Option<Role> {
        self.read().auth.as_ref().map(|a| a.principal.role)
    }
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("phase", &self.snapshot().phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use agrotrace_core::{CompanyId, UserId};

    use agrotrace_access::Role;

    use crate::transport::{AuthPayload, TransportError};
    use crate::vault::{InMemoryVault, VaultError};

    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: UserId::new(),
            email: "admin@x.com".into(),
            display_name: "Admin".into(),
            role,
            company_id: CompanyId::new(),
            active: true,
        }
    }

    fn payload(token: &str, role: Role) -> AuthPayload {
        AuthPayload {
            access_token: AccessToken::new(token),
            refresh_token: RefreshToken::new(format!("refresh-{token}")),
            principal: principal(role),
        }
    }

    /// Transport whose answers are scripted in call order. A login call takes
    /// the next result (and, when present, waits on the next gate) so tests
    /// can hold a login in flight while something else races it.
    struct ScriptedTransport {
        logins: Mutex<VecDeque<Result<LoginOutcome, TransportError>>>,
        gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
        logout_calls: AtomicUsize,
        logout_result: Mutex<Option<TransportError>>,
    }

    impl ScriptedTransport {
        fn scripted(results: Vec<Result<LoginOutcome, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                logins: Mutex::new(results.into()),
                gates: Mutex::new(VecDeque::new()),
                logout_calls: AtomicUsize::new(0),
                logout_result: Mutex::new(None),
            })
        }

        fn accepting(payload: AuthPayload) -> Arc<Self> {
            Self::scripted(vec![Ok(LoginOutcome::Accepted(payload))])
        }

        fn rejecting(message: Option<&str>) -> Arc<Self> {
            Self::scripted(vec![Ok(LoginOutcome::Rejected {
                message: message.map(str::to_string),
            })])
        }

        fn failing(error: TransportError) -> Arc<Self> {
            Self::scripted(vec![Err(error)])
        }

        /// Make the next `login` call wait until the returned sender fires.
        fn gate_next_login(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }

        fn logout_calls(&self) -> usize {
            self.logout_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialTransport for ScriptedTransport {
        async fn login(&self, _request: &LoginRequest) -> Result<LoginOutcome, TransportError> {
            // Take the script entry for *this* call before suspending, so
            // results pair with calls in order regardless of release order.
            let result = self
                .logins
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted login call");
            let gate = self.gates.lock().unwrap().pop_front();

            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }

        async fn logout(&self) -> Result<(), TransportError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            match self.logout_result.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    /// Counts `clear` calls so idempotence tests can assert that a repeated
    /// collapse skips the storage side effect.
    struct CountingVault {
        inner: InMemoryVault,
        clears: AtomicUsize,
    }

    impl CountingVault {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: InMemoryVault::new(),
                clears: AtomicUsize::new(0),
            })
        }
    }

    impl CredentialVault for CountingVault {
        fn load(&self) -> Option<StoredCredentials> {
            self.inner.load()
        }

        fn store(&self, credentials: &StoredCredentials) -> Result<(), VaultError> {
            self.inner.store(credentials)
        }

        fn clear(&self) -> Result<(), VaultError> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            self.inner.clear()
        }
    }

    fn request() -> LoginRequest {
        LoginRequest::new("admin@x.com", "admin123")
    }

    fn store_with(
        transport: Arc<ScriptedTransport>,
        vault: Arc<InMemoryVault>,
    ) -> Arc<SessionStore> {
        Arc::new(SessionStore::new(transport, vault))
    }

    #[tokio::test]
    async fn successful_login_authenticates_and_persists() {
        let vault = Arc::new(InMemoryVault::new());
        let store = store_with(
            ScriptedTransport::accepting(payload("t1", Role::CompanyAdmin)),
            Arc::clone(&vault),
        );

        assert!(store.login(request()).await);

        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.phase(), SessionPhase::Authenticated);
        assert_eq!(snapshot.error, None);
        assert!(!snapshot.loading);
        assert!(!snapshot.session_expired);
        assert_eq!(snapshot.access_token, Some(AccessToken::new("t1")));

        let stored = vault.load().expect("credentials persisted");
        assert_eq!(stored.access_token, AccessToken::new("t1"));
        assert_eq!(stored.principal.role, Role::CompanyAdmin);
    }

    #[tokio::test]
    async fn rejected_login_surfaces_the_backend_message() {
        let store = store_with(
            ScriptedTransport::rejecting(Some("Credenciales inválidas")),
            Arc::new(InMemoryVault::new()),
        );

        assert!(!store.login(request()).await);

        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated());
        assert_eq!(snapshot.phase(), SessionPhase::Anonymous);
        assert_eq!(snapshot.error.as_deref(), Some("Credenciales inválidas"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn failed_relogin_drops_memory_but_not_the_vault() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::scripted(vec![
            Ok(LoginOutcome::Accepted(payload("t1", Role::Producer))),
            Ok(LoginOutcome::Rejected { message: None }),
        ]);
        let store = store_with(transport, Arc::clone(&vault));

        assert!(store.login(request()).await);
        assert!(!store.login(request()).await);

        assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
        let stored = vault.load().expect("failure must not clear the vault");
        assert_eq!(stored.access_token, AccessToken::new("t1"));
    }

    #[tokio::test]
    async fn rejection_without_message_falls_back_to_the_fixed_text() {
        let store = store_with(
            ScriptedTransport::rejecting(None),
            Arc::new(InMemoryVault::new()),
        );

        assert!(!store.login(request()).await);
        assert_eq!(
            store.snapshot().error.as_deref(),
            Some(messages::LOGIN_FALLBACK)
        );
    }

    #[tokio::test]
    async fn transport_failure_uses_its_message_or_the_fallback() {
        let store = store_with(
            ScriptedTransport::failing(TransportError::Failed {
                message: "timeout esperando al servidor".into(),
            }),
            Arc::new(InMemoryVault::new()),
        );
        assert!(!store.login(request()).await);
        assert_eq!(
            store.snapshot().error.as_deref(),
            Some("timeout esperando al servidor")
        );

        let store = store_with(
            ScriptedTransport::failing(TransportError::Unreachable),
            Arc::new(InMemoryVault::new()),
        );
        assert!(!store.login(request()).await);
        assert_eq!(
            store.snapshot().error.as_deref(),
            Some(messages::LOGIN_FALLBACK)
        );
    }

    #[tokio::test]
    async fn login_clears_a_previous_error_on_entry() {
        let transport = ScriptedTransport::scripted(vec![
            Ok(LoginOutcome::Rejected { message: None }),
            Ok(LoginOutcome::Accepted(payload("t1", Role::Producer))),
        ]);
        let store = store_with(transport, Arc::new(InMemoryVault::new()));

        assert!(!store.login(request()).await);
        assert!(store.snapshot().error.is_some());

        assert!(store.login(request()).await);
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn logout_clears_credentials_but_keeps_the_expiry_banner() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let store = store_with(Arc::clone(&transport), Arc::clone(&vault));

        assert!(store.login(request()).await);
        store.handle_session_expired();
        store.logout().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated());
        assert!(snapshot.session_expired, "expiry flag must survive logout");
        assert_eq!(snapshot.error.as_deref(), Some(messages::SESSION_EXPIRED));
        assert!(vault.load().is_none());
        assert_eq!(transport.logout_calls(), 1);
    }

    #[tokio::test]
    async fn logout_swallows_a_failing_server_call() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        *transport.logout_result.lock().unwrap() = Some(TransportError::Unreachable);
        let store = store_with(Arc::clone(&transport), Arc::clone(&vault));

        assert!(store.login(request()).await);
        store.logout().await;

        assert!(!store.snapshot().is_authenticated());
        assert!(vault.load().is_none());
    }

    #[tokio::test]
    async fn expiry_collapses_and_a_fresh_login_recovers() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::scripted(vec![
            Ok(LoginOutcome::Accepted(payload("t1", Role::Producer))),
            Ok(LoginOutcome::Accepted(payload("t2", Role::Producer))),
        ]);
        let store = store_with(transport, Arc::clone(&vault));

        assert!(store.login(request()).await);
        store.handle_session_expired();

        let collapsed = store.snapshot();
        assert!(!collapsed.is_authenticated());
        assert_eq!(collapsed.phase(), SessionPhase::SessionExpired);
        assert!(collapsed.session_expired);
        assert_eq!(collapsed.error.as_deref(), Some(messages::SESSION_EXPIRED));
        assert!(vault.load().is_none(), "expiry clears the vault");

        assert!(store.login(request()).await);
        let recovered = store.snapshot();
        assert!(recovered.is_authenticated());
        assert!(!recovered.session_expired);
        assert_eq!(recovered.error, None);
        assert_eq!(recovered.access_token, Some(AccessToken::new("t2")));
    }

    #[tokio::test]
    async fn repeated_expiry_signals_repeat_no_side_effects() {
        let vault = CountingVault::new();
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let store = Arc::new(SessionStore::new(transport, Arc::clone(&vault) as _));

        assert!(store.login(request()).await);

        store.handle_session_expired();
        let after_first = store.snapshot();
        let clears_after_first = vault.clears.load(Ordering::SeqCst);

        store.handle_session_expired();
        store.handle_session_expired();

        assert_eq!(store.snapshot(), after_first);
        assert_eq!(vault.clears.load(Ordering::SeqCst), clears_after_first);
    }

    #[tokio::test]
    async fn expiry_during_a_login_that_fails_leaves_the_store_collapsed() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::rejecting(Some("Credenciales inválidas"));
        let release = transport.gate_next_login();
        let store = store_with(transport, Arc::clone(&vault));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(request()).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().phase(), SessionPhase::Authenticating);

        store.handle_session_expired();
        release.send(()).unwrap();

        assert!(!pending.await.unwrap());
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated());
        assert!(
            snapshot.session_expired,
            "failed login must not un-expire the session"
        );
        assert!(vault.load().is_none());
    }

    #[tokio::test]
    async fn expiry_during_a_login_that_succeeds_is_superseded() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let release = transport.gate_next_login();
        let store = store_with(transport, Arc::clone(&vault));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(request()).await }
        });
        tokio::task::yield_now().await;

        store.handle_session_expired();
        release.send(()).unwrap();

        assert!(pending.await.unwrap());
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated());
        assert!(!snapshot.session_expired);
        assert!(vault.load().is_some(), "fresh credentials are persisted");
    }

    #[tokio::test]
    async fn login_resolving_after_logout_is_discarded() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let release = transport.gate_next_login();
        let store = store_with(Arc::clone(&transport), Arc::clone(&vault));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(request()).await }
        });
        tokio::task::yield_now().await;

        store.logout().await;
        release.send(()).unwrap();

        assert!(!pending.await.unwrap(), "stale login must report failure");
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated());
        assert!(!snapshot.loading);
        assert!(vault.load().is_none(), "stale login must not write the vault");
    }

    #[tokio::test]
    async fn a_newer_login_attempt_wins_over_an_older_one() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::scripted(vec![
            Ok(LoginOutcome::Accepted(payload("t-old", Role::Producer))),
            Ok(LoginOutcome::Accepted(payload("t-new", Role::Producer))),
        ]);
        let release_old = transport.gate_next_login();
        let release_new = transport.gate_next_login();
        let store = store_with(transport, Arc::clone(&vault));

        let old = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(request()).await }
        });
        tokio::task::yield_now().await;
        let new = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(request()).await }
        });
        tokio::task::yield_now().await;

        release_new.send(()).unwrap();
        assert!(new.await.unwrap());

        release_old.send(()).unwrap();
        assert!(!old.await.unwrap(), "superseded attempt must report failure");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.access_token, Some(AccessToken::new("t-new")));
        assert_eq!(
            vault.load().unwrap().access_token,
            AccessToken::new("t-new")
        );
    }

    #[tokio::test]
    async fn check_auth_restores_a_persisted_session() {
        let stored = StoredCredentials::new(
            AccessToken::new("t1"),
            RefreshToken::new("r1"),
            principal(Role::Auditor),
        );
        let vault = Arc::new(InMemoryVault::holding(stored));
        let transport = ScriptedTransport::scripted(vec![]);
        let store = store_with(transport, vault);

        assert!(store.hydrate());

        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.principal.unwrap().role, Role::Auditor);
        assert_eq!(snapshot.refresh_token, Some(RefreshToken::new("r1")));
    }

    #[tokio::test]
    async fn check_auth_drops_the_session_when_storage_was_cleared_out_of_band() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let store = store_with(transport, Arc::clone(&vault));

        assert!(store.login(request()).await);
        assert!(store.check_auth());

        // Something outside the store wiped the vault.
        vault.clear().unwrap();

        assert!(!store.check_auth());
        assert!(!store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn set_user_replaces_the_principal_and_keeps_tokens() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::accepting(payload("t1", Role::Producer));
        let store = store_with(transport, Arc::clone(&vault));

        assert!(store.login(request()).await);

        let mut renamed = principal(Role::Producer);
        renamed.display_name = "María de los Ángeles".into();
        store.set_user(renamed.clone());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.principal, Some(renamed.clone()));
        assert_eq!(snapshot.access_token, Some(AccessToken::new("t1")));

        let stored = vault.load().unwrap();
        assert_eq!(stored.principal, renamed);
        assert_eq!(stored.access_token, AccessToken::new("t1"));
    }

    #[tokio::test]
    async fn set_user_is_ignored_when_signed_out() {
        let vault = Arc::new(InMemoryVault::new());
        let transport = ScriptedTransport::scripted(vec![]);
        let store = store_with(transport, Arc::clone(&vault));

        store.set_user(principal(Role::Producer));

        assert!(!store.snapshot().is_authenticated());
        assert!(vault.load().is_none());
    }

    #[tokio::test]
    async fn flag_clears_are_plain_resets() {
        let store = store_with(
            ScriptedTransport::rejecting(None),
            Arc::new(InMemoryVault::new()),
        );

        assert!(!store.login(request()).await);
        assert!(store.snapshot().error.is_some());
        store.clear_error();
        assert_eq!(store.snapshot().error, None);

        store.handle_session_expired();
        assert!(store.snapshot().session_expired);
        store.clear_session_expired();
        let snapshot = store.snapshot();
        assert!(!snapshot.session_expired);
        assert_eq!(snapshot.phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn the_store_is_a_principal_source() {
        let store = store_with(
            ScriptedTransport::accepting(payload("t1", Role::PlantOperator)),
            Arc::new(InMemoryVault::new()),
        );

        assert_eq!(store.current_role(), None);
        assert!(store.login(request()).await);
        assert_eq!(store.current_role(), Some(Role::PlantOperator));
        assert!(store.current_principal().is_some());
    }
}
