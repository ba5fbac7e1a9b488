//! Permission grant store boundary.
//!
//! Admins bypass this store entirely; everyone else needs an explicit grant
//! per operation. Grants are keyed by principal so a token's subject can be
//! checked directly.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use shopdesk_auth::Permission;
use shopdesk_core::PrincipalId;

#[derive(Debug, Error)]
pub enum GrantStoreError {
    #[error("storage failure: {0}")]
    Storage(String),
}

pub trait GrantStore: Send + Sync {
    fn grant(&self, principal: PrincipalId, permission: Permission) -> Result<(), GrantStoreError>;

    fn revoke(&self, principal: PrincipalId, permission: &Permission) -> Result<(), GrantStoreError>;

    fn grants_for(&self, principal: PrincipalId) -> Result<Vec<Permission>, GrantStoreError>;
}

impl<G> GrantStore for Arc<G>
where
    G: GrantStore + ?Sized,
{
    fn grant(&self, principal: PrincipalId, permission: Permission) -> Result<(), GrantStoreError> {
        (**self).grant(principal, permission)
    }

    fn revoke(&self, principal: PrincipalId, permission: &Permission) -> Result<(), GrantStoreError> {
        (**self).revoke(principal, permission)
    }

    fn grants_for(&self, principal: PrincipalId) -> Result<Vec<Permission>, GrantStoreError> {
        (**self).grants_for(principal)
    }
}

/// In-memory grant store.
#[derive(Debug, Default)]
pub struct InMemoryGrantStore {
    grants: RwLock<HashMap<PrincipalId, HashSet<Permission>>>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrantStore for InMemoryGrantStore {
    fn grant(&self, principal: PrincipalId, permission: Permission) -> Result<(), GrantStoreError> {
        let mut grants = self
            .grants
            .write()
            .map_err(|_| GrantStoreError::Storage("lock poisoned".to_string()))?;

        grants.entry(principal).or_default().insert(permission);
        Ok(())
    }

    fn revoke(&self, principal: PrincipalId, permission: &Permission) -> Result<(), GrantStoreError> {
        let mut grants = self
            .grants
            .write()
            .map_err(|_| GrantStoreError::Storage("lock poisoned".to_string()))?;

        if let Some(set) = grants.get_mut(&principal) {
            set.remove(permission);
        }
        Ok(())
    }

    fn grants_for(&self, principal: PrincipalId) -> Result<Vec<Permission>, GrantStoreError> {
        let grants = self
            .grants
            .read()
            .map_err(|_| GrantStoreError::Storage("lock poisoned".to_string()))?;

        let mut listed: Vec<Permission> = grants
            .get(&principal)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        listed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(listed)
    }
}
