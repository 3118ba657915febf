//! agrotrace-events — in-process signalling between layers that must stay
//! decoupled (transport interceptors, the session store, UI shells).
//!
//! The crate is deliberately small: a broadcast [`SignalBus`] contract, an
//! in-memory implementation, and the signal payloads themselves.

pub mod bus;
pub mod in_memory_bus;
pub mod signal;

pub use bus::{SignalBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemorySignalBus};
pub use signal::SessionInvalidated;
