use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use shopdesk_banking::TransactionRecord;
use shopdesk_core::ExpectedSequence;

/// A transaction persisted to the log (assigned a sequence number).
///
/// Sequence numbers are assigned by the log during append, start at 1, and
/// increase by exactly one per record. They double as the optimistic
/// concurrency token: a writer evaluates against the snapshot at sequence
/// `n` and appends with `ExpectedSequence::Exact(n)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub sequence: u64,
    pub record: TransactionRecord,
}

/// Inclusive date-range filter for listing transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn matches(&self, recorded_at: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if recorded_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if recorded_at > to {
                return false;
            }
        }
        true
    }
}

/// Transaction log operation error.
///
/// Infrastructure errors only; a rejected transaction never reaches the log.
#[derive(Debug, Error)]
pub enum TransactionLogError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Append-only log of evaluated transactions.
///
/// Implementations must:
/// - enforce the optimistic concurrency check against the latest sequence
/// - assign sequence numbers monotonically with no gaps
/// - never modify or delete a stored record
pub trait TransactionLog: Send + Sync {
    /// Append one evaluated record, conditional on the current sequence.
    fn append(
        &self,
        record: TransactionRecord,
        expected: ExpectedSequence,
    ) -> Result<StoredTransaction, TransactionLogError>;

    /// The most recently appended transaction, if any. Its `record.balances`
    /// is the current balance snapshot.
    fn latest(&self) -> Result<Option<StoredTransaction>, TransactionLogError>;

    /// All transactions matching the filter, newest first.
    fn list(&self, filter: &TransactionFilter) -> Result<Vec<StoredTransaction>, TransactionLogError>;
}

impl<S> TransactionLog for Arc<S>
where
    S: TransactionLog + ?Sized,
{
    fn append(
        &self,
        record: TransactionRecord,
        expected: ExpectedSequence,
    ) -> Result<StoredTransaction, TransactionLogError> {
        (**self).append(record, expected)
    }

    fn latest(&self) -> Result<Option<StoredTransaction>, TransactionLogError> {
        (**self).latest()
    }

    fn list(&self, filter: &TransactionFilter) -> Result<Vec<StoredTransaction>, TransactionLogError> {
        (**self).list(filter)
    }
}
