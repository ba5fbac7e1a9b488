//! `shopdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod sequence;

pub use error::{DomainError, DomainResult};
pub use id::{EmployeeId, PrincipalId};
pub use sequence::ExpectedSequence;
