//! Signal publishing/subscription abstraction (mechanics only).
//!
//! A signal bus carries small control notices between layers that must not
//! know about each other. The motivating case: the HTTP layer observes a
//! rejected credential (401 after a failed refresh) and must tell the session
//! store to collapse the session, without holding a reference to the store.
//!
//! Design constraints:
//!
//! - **Transport-agnostic**: in-memory channels today; nothing in the contract
//!   assumes a particular delivery mechanism.
//! - **Broadcast semantics**: every subscriber sees every signal.
//! - **Duplicates tolerated**: emitters may fire the same notice more than
//!   once (several in-flight requests can fail against the same expired
//!   session). Consumers must treat repeats as no-ops.
//! - **No persistence**: a signal published while nobody is subscribed is
//!   gone. Subscribe before the first publish.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a signal stream.
///
/// Each subscription receives a copy of every signal published after it was
/// created (broadcast semantics). Intended for single-threaded consumption;
/// a typical consumer is a dedicated listener thread:
///
/// ```ignore
/// let sub = bus.subscribe();
/// loop {
///     match sub.recv_timeout(Duration::from_millis(250)) {
///         Ok(signal) => react(signal),
///         Err(RecvTimeoutError::Timeout) => continue,      // check for shutdown
///         Err(RecvTimeoutError::Disconnected) => break,    // bus dropped
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<S> {
    receiver: Receiver<S>,
}

impl<S> Subscription<S> {
    pub fn new(receiver: Receiver<S>) -> Self {
        Self { receiver }
    }

    /// Block until the next signal is available.
    pub fn recv(&self) -> Result<S, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a signal without blocking.
    pub fn try_recv(&self) -> Result<S, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a signal.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<S, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic signal bus (pub/sub contract).
///
/// `publish` can fail (lock poisoning, a full queue in some future transport);
/// failures surface to the emitter, which may retry. Since consumers are
/// idempotent, retrying publication is always safe.
///
/// Implementations must be shareable across threads; emitters publish from
/// whatever thread noticed the condition.
pub trait SignalBus<S>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, signal: S) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<S>;
}

impl<S, B> SignalBus<S> for Arc<B>
where
    B: SignalBus<S> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, signal: S) -> Result<(), Self::Error> {
        (**self).publish(signal)
    }

    fn subscribe(&self) -> Subscription<S> {
        (**self).subscribe()
    }
}
