//! Optimistic concurrency expectations for append-only logs.

use crate::error::{DomainError, DomainResult};

/// Expected head position of an append-only log at write time.
///
/// A writer that read the log at sequence `n` appends with `Exact(n)`; the
/// store rejects the append if another writer got there first. This closes
/// the lost-update window in the read-evaluate-append cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedSequence {
    /// Skip the check (migrations, seeding, idempotent writes).
    Any,
    /// Require the log head to be at an exact sequence.
    Exact(u64),
}

impl ExpectedSequence {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedSequence::Any => true,
            ExpectedSequence::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
