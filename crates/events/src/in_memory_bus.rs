//! In-memory signal bus for single-process apps and tests.

use std::sync::{Mutex, mpsc};

use crate::bus::{SignalBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out
/// - Duplicate delivery acceptable (subscribers must be idempotent)
#[derive(Debug)]
pub struct InMemorySignalBus<S> {
    subscribers: Mutex<Vec<mpsc::Sender<S>>>,
}

impl<S> InMemorySignalBus<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Default for InMemorySignalBus<S> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<S> SignalBus<S> for InMemorySignalBus<S>
where
    S: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, signal: S) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(signal.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<S> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive signals until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
