//! `shopdesk-infra` — storage boundaries for the shop's back office.
//!
//! Everything here is an in-process implementation behind a trait, so the API
//! layer never assumes a particular backend. The transaction log is the only
//! append-only store; the directory and grant store are plain keyed maps.

pub mod grant_store;
pub mod staff_directory;
pub mod transaction_log;

pub use grant_store::{GrantStore, GrantStoreError, InMemoryGrantStore};
pub use staff_directory::{EmployeeDirectory, InMemoryEmployeeDirectory, StaffDirectoryError};
pub use transaction_log::{
    InMemoryTransactionLog, StoredTransaction, TransactionFilter, TransactionLog,
    TransactionLogError,
};
