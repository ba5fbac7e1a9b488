//! Employee directory boundary.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use shopdesk_core::EmployeeId;
use shopdesk_staff::Employee;

#[derive(Debug, Error)]
pub enum StaffDirectoryError {
    #[error("employee already registered: {0}")]
    Duplicate(EmployeeId),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Keyed store of the shop's employees.
pub trait EmployeeDirectory: Send + Sync {
    fn insert(&self, employee: Employee) -> Result<(), StaffDirectoryError>;

    fn get(&self, id: EmployeeId) -> Result<Option<Employee>, StaffDirectoryError>;

    /// All employees, oldest registration first.
    fn list(&self) -> Result<Vec<Employee>, StaffDirectoryError>;
}

impl<D> EmployeeDirectory for Arc<D>
where
    D: EmployeeDirectory + ?Sized,
{
    fn insert(&self, employee: Employee) -> Result<(), StaffDirectoryError> {
        (**self).insert(employee)
    }

    fn get(&self, id: EmployeeId) -> Result<Option<Employee>, StaffDirectoryError> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<Employee>, StaffDirectoryError> {
        (**self).list()
    }
}

/// In-memory employee directory.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn insert(&self, employee: Employee) -> Result<(), StaffDirectoryError> {
        let mut employees = self
            .employees
            .write()
            .map_err(|_| StaffDirectoryError::Storage("lock poisoned".to_string()))?;

        if employees.contains_key(&employee.id()) {
            return Err(StaffDirectoryError::Duplicate(employee.id()));
        }
        employees.insert(employee.id(), employee);
        Ok(())
    }

    fn get(&self, id: EmployeeId) -> Result<Option<Employee>, StaffDirectoryError> {
        let employees = self
            .employees
            .read()
            .map_err(|_| StaffDirectoryError::Storage("lock poisoned".to_string()))?;

        Ok(employees.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Employee>, StaffDirectoryError> {
        let employees = self
            .employees
            .read()
            .map_err(|_| StaffDirectoryError::Storage("lock poisoned".to_string()))?;

        let mut all: Vec<Employee> = employees.values().cloned().collect();
        all.sort_by_key(|e| (e.registered_at(), e.id()));
        Ok(all)
    }
}
