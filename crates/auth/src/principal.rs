use crate::{Permission, Role};

pub use shopdesk_core::PrincipalId;

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API derives roles from token claims and permissions from a
/// policy source (the grant store), then asks [`crate::authorize`] for a
/// decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(principal_id: PrincipalId, roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self {
            principal_id,
            roles,
            permissions,
        }
    }
}
