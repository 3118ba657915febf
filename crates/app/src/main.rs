//! Walks the full session lifecycle against a canned backend: hydrate,
//! a rejected login, an accepted one, a remote invalidation, recovery,
//! logout. Run with `RUST_LOG=debug` to watch every transition.

use std::sync::Arc;
use std::time::Duration;

use anyhow::ensure;

use agrotrace_access::{Principal, Role};
use agrotrace_app::report;
use agrotrace_app::scripted::DemoTransport;
use agrotrace_core::{CompanyId, UserId};
use agrotrace_events::{InMemorySignalBus, SessionInvalidated, SignalBus};
use agrotrace_routing::{RouteGuard, RouteRequest};
use agrotrace_session::{
    CredentialVault, InMemoryVault, JsonFileVault, LoginRequest, SessionStore,
    spawn_expiry_listener,
};

const DEMO_EMAIL: &str = "admin@agrotrace.dev";
const DEMO_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agrotrace_observability::init();

    let vault: Arc<dyn CredentialVault> = match JsonFileVault::open_default() {
        Ok(vault) => {
            tracing::info!(path = %vault.path().display(), "using the on-disk vault");
            Arc::new(vault)
        }
        Err(err) => {
            tracing::warn!("no data directory, the session will not survive a restart: {err:?}");
            Arc::new(InMemoryVault::new())
        }
    };

    let transport = Arc::new(DemoTransport::accepting(
        DEMO_EMAIL,
        DEMO_PASSWORD,
        Principal {
            id: UserId::new(),
            email: DEMO_EMAIL.into(),
            display_name: "Demo Admin".into(),
            role: Role::CompanyAdmin,
            company_id: CompanyId::new(),
            active: true,
        },
    ));

    let bus = Arc::new(InMemorySignalBus::new());
    let store = Arc::new(SessionStore::new(transport, vault));
    // Subscribed before anything can publish, so no signal is missed.
    let listener = spawn_expiry_listener(Arc::clone(&store), bus.subscribe());
    let guard = RouteGuard::new(Arc::clone(&store));

    if store.hydrate() {
        tracing::info!("a previous session survived, signing it out to start clean");
        store.logout().await;
    }

    let decision = guard.decide(&RouteRequest::to("/lots"));
    tracing::info!(?decision, "navigated to /lots while signed out");

    ensure!(
        !store.login(LoginRequest::new(DEMO_EMAIL, "wrong")).await,
        "the canned backend accepted a bad password"
    );
    tracing::info!(error = ?store.snapshot().error, "bad password rejected");

    ensure!(
        store.login(LoginRequest::new(DEMO_EMAIL, DEMO_PASSWORD)).await,
        "the canned backend rejected its own credentials"
    );

    let snapshot = store.snapshot();
    let Some(principal) = snapshot.principal else {
        anyhow::bail!("authenticated without a principal");
    };
    println!("{}", report::permissions_table(principal.role));
    println!("menu: {}\n", report::navigation_menu(principal.role));

    let decision = guard.decide(&RouteRequest::to("/lots"));
    tracing::info!(?decision, "navigated to /lots signed in");

    bus.publish(SessionInvalidated)
        .map_err(|err| anyhow::anyhow!("publishing the invalidation signal failed: {err:?}"))?;
    wait_for_collapse(&store).await?;

    let decision = guard.decide(&RouteRequest::to("/lots"));
    tracing::info!(?decision, "navigated to /lots after the session expired");

    ensure!(
        store.login(LoginRequest::new(DEMO_EMAIL, DEMO_PASSWORD)).await,
        "re-authentication after expiry failed"
    );
    ensure!(
        !store.snapshot().session_expired,
        "a successful login must clear the expiry flag"
    );

    store.logout().await;
    listener.stop();
    tracing::info!("walkthrough complete");
    Ok(())
}

/// The expiry listener reacts on its own thread; give it a moment.
async fn wait_for_collapse(store: &SessionStore) -> anyhow::Result<()> {
    for _ in 0..40 {
        if store.snapshot().session_expired {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("the expiry signal was never handled")
}
