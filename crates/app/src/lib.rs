//! `agrotrace-app` — demo wiring of the whole stack into one binary.
//!
//! The binary in `main.rs` owns the walkthrough; this library holds the
//! pieces it wires together, kept separate so they stay testable.

pub mod report;
pub mod scripted;
