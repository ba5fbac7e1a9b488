//! Append-only transaction log boundary.
//!
//! The log is the single source of truth for balances: the latest stored
//! record carries the current snapshot, and every append is conditional on
//! the sequence number the caller evaluated against.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryTransactionLog;
pub use r#trait::{StoredTransaction, TransactionFilter, TransactionLog, TransactionLogError};
