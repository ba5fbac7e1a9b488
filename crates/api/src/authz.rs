//! API-side authorization guard for operations.
//!
//! This enforces authorization at the handler boundary (before any storage
//! access), while keeping the banking evaluator and infra auth-agnostic.

use axum::http::StatusCode;

use shopdesk_auth::{authorize, Permission, Principal};
use shopdesk_infra::GrantStore;

use crate::app::errors;
use crate::context::PrincipalContext;

/// Check authorization for a named operation in the current request context.
///
/// The `"admin"` role bypasses per-operation grants; everyone else needs an
/// explicit grant from the grant store.
pub fn authorize_operation(
    grants: &dyn GrantStore,
    principal: &PrincipalContext,
    required: &Permission,
) -> Result<(), axum::response::Response> {
    let permissions = if principal.roles().iter().any(|r| r.is_admin()) {
        vec![Permission::new("*")]
    } else {
        grants.grants_for(principal.principal_id()).map_err(|e| {
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "grant_store_error", e.to_string())
        })?
    };

    let resolved = Principal::new(
        principal.principal_id(),
        principal.roles().to_vec(),
        permissions,
    );

    authorize(&resolved, required)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
