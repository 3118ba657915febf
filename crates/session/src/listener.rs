//! Background bridge from the expiry signal to the store.
//!
//! The HTTP layer cannot call the store directly without creating a
//! dependency cycle, so it publishes [`SessionInvalidated`] on the signal bus
//! and this listener reacts. One listener per store is enough; extra signals
//! are harmless because [`SessionStore::handle_session_expired`] is
//! idempotent.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use agrotrace_events::{SessionInvalidated, Subscription};

use crate::store::SessionStore;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Handle to the listener thread. Dropping it (or calling [`stop`]) shuts the
/// thread down and joins it.
///
/// [`stop`]: ExpiryListener::stop
#[derive(Debug)]
pub struct ExpiryListener {
    stop: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

/// Start reacting to [`SessionInvalidated`] signals on a dedicated thread.
///
/// Subscribe before wiring the transport so no early signal is missed.
pub fn spawn_expiry_listener(
    store: Arc<SessionStore>,
    signals: Subscription<SessionInvalidated>,
) -> ExpiryListener {
    let (stop_tx, stop_rx) = mpsc::channel();

    let thread = thread::Builder::new()
        .name("session-expiry-listener".into())
        .spawn(move || {
            loop {
                match signals.recv_timeout(POLL_INTERVAL) {
                    Ok(SessionInvalidated) => store.handle_session_expired(),
                    Err(RecvTimeoutError::Timeout) => match stop_rx.try_recv() {
                        Err(TryRecvError::Empty) => continue,
                        Ok(()) | Err(TryRecvError::Disconnected) => break,
                    },
                    // Bus gone, nothing left to listen to.
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("expiry listener stopped");
        });

    match thread {
        Ok(handle) => ExpiryListener {
            stop: stop_tx,
            thread: Some(handle),
        },
        Err(err) => {
            // Out of threads this early means the process is in real
            // trouble; the session still works, expiry just goes unnoticed.
            tracing::warn!("could not spawn the expiry listener: {err:?}");
            ExpiryListener {
                stop: stop_tx,
                thread: None,
            }
        }
    }
}

impl ExpiryListener {
    /// Stop the thread and wait for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ExpiryListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}
