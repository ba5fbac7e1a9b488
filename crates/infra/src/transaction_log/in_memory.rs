use std::sync::RwLock;

use shopdesk_banking::TransactionRecord;
use shopdesk_core::ExpectedSequence;

use super::r#trait::{StoredTransaction, TransactionFilter, TransactionLog, TransactionLogError};

/// In-memory append-only transaction log.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    records: RwLock<Vec<StoredTransaction>>,
}

impl InMemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_sequence(records: &[StoredTransaction]) -> u64 {
        records.last().map(|t| t.sequence).unwrap_or(0)
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn append(
        &self,
        record: TransactionRecord,
        expected: ExpectedSequence,
    ) -> Result<StoredTransaction, TransactionLogError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| TransactionLogError::Storage("lock poisoned".to_string()))?;

        let current = Self::current_sequence(&records);
        if !expected.matches(current) {
            return Err(TransactionLogError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        let stored = StoredTransaction {
            sequence: current + 1,
            record,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    fn latest(&self) -> Result<Option<StoredTransaction>, TransactionLogError> {
        let records = self
            .records
            .read()
            .map_err(|_| TransactionLogError::Storage("lock poisoned".to_string()))?;

        Ok(records.last().cloned())
    }

    fn list(&self, filter: &TransactionFilter) -> Result<Vec<StoredTransaction>, TransactionLogError> {
        let records = self
            .records
            .read()
            .map_err(|_| TransactionLogError::Storage("lock poisoned".to_string()))?;

        Ok(records
            .iter()
            .rev()
            .filter(|t| filter.matches(t.record.recorded_at))
            .cloned()
            .collect())
    }
}
