//! `agrotrace-core` — foundation building blocks for the authorization core.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CompanyId, UserId};
