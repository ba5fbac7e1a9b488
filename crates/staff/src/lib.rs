//! `shopdesk-staff` — the shop's employee roster.
//!
//! Employees appear in the ledger as borrowing counterparties and can be
//! granted operation permissions. This crate holds the model only; the
//! directory that stores it lives in `shopdesk-infra`.

pub mod employee;

pub use employee::{ContactInfo, Employee, EmployeeStatus};
pub use shopdesk_core::EmployeeId;
