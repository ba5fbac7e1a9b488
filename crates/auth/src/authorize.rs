use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authorized to perform operation '{0}'")]
    Forbidden(String),
}

/// Authorize a principal for a named operation.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// The `"admin"` role is resolved to a wildcard by the policy layer before
/// this is called; here only the permission set matters.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
