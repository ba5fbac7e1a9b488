use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopdesk_core::{DomainError, EmployeeId};

/// Employee status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

/// Contact information for an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A member of the shop's staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    name: String,
    contact: ContactInfo,
    status: EmployeeStatus,
    registered_at: DateTime<Utc>,
}

impl Employee {
    /// Register a new employee. The name must not be blank.
    pub fn register(
        name: impl Into<String>,
        contact: Option<ContactInfo>,
        registered_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id: EmployeeId::new(),
            name,
            contact: contact.unwrap_or_default(),
            status: EmployeeStatus::Active,
            registered_at,
        })
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> EmployeeStatus {
        self.status
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Invariant helper: only active employees may borrow from the drawer.
    pub fn can_borrow(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if self.status == EmployeeStatus::Inactive {
            return Err(DomainError::conflict("employee is already inactive"));
        }
        self.status = EmployeeStatus::Inactive;
        Ok(())
    }
}
