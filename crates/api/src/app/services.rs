use std::sync::Arc;

use shopdesk_infra::{
    EmployeeDirectory, GrantStore, InMemoryEmployeeDirectory, InMemoryGrantStore,
    InMemoryTransactionLog, TransactionLog,
};

/// Shared application services injected into handlers.
///
/// Handlers only see the trait objects, so swapping the in-memory stores for
/// a durable backend is a wiring change here, not a handler change.
pub struct AppServices {
    pub log: Arc<dyn TransactionLog>,
    pub directory: Arc<dyn EmployeeDirectory>,
    pub grants: Arc<dyn GrantStore>,
}

/// Default in-process wiring.
pub fn build_services() -> AppServices {
    AppServices {
        log: Arc::new(InMemoryTransactionLog::new()),
        directory: Arc::new(InMemoryEmployeeDirectory::new()),
        grants: Arc::new(InMemoryGrantStore::new()),
    }
}
