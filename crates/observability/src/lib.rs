//! `agrotrace-observability` — shared logging setup.

/// Initialize process-wide observability (tracing/logging) with defaults.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use tracing::{LogFormat, init_with};
