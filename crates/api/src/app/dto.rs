use core::str::FromStr;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use shopdesk_banking::{BalanceSheet, PaymentMethod, TransactionKind};
use shopdesk_core::EmployeeId;
use shopdesk_infra::StoredTransaction;
use shopdesk_staff::Employee;

use crate::app::errors;

/// Body for `POST /transactions`.
///
/// `kind` and `payment_method` arrive as strings so that unknown values can
/// be answered with a helpful 400 instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub kind: String,
    pub amount: Decimal,
    pub charge: Option<Decimal>,
    pub payment_method: Option<String>,
    pub employee_id: Option<String>,
    pub note: Option<String>,
}

/// Body for `POST /employees`.
#[derive(Debug, Deserialize)]
pub struct RegisterEmployeeRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Body for `POST /employees/:id/grants`.
#[derive(Debug, Deserialize)]
pub struct GrantPermissionRequest {
    pub permission: String,
}

pub fn parse_transaction_kind(s: &str) -> Result<TransactionKind, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "deposit" => Ok(TransactionKind::Deposit),
        "withdrawal" => Ok(TransactionKind::Withdrawal),
        "borrowing" => Ok(TransactionKind::Borrowing),
        "ledger_transfer" => Ok(TransactionKind::LedgerTransfer),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_kind",
            "kind must be one of: deposit, withdrawal, borrowing, ledger_transfer",
        )),
    }
}

pub fn parse_payment_method(s: &str) -> Result<PaymentMethod, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "paynearby" => Ok(PaymentMethod::PayNearby),
        "online" => Ok(PaymentMethod::Online),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_payment_method",
            "payment_method must be one of: paynearby, online",
        )),
    }
}

pub fn parse_employee_id(s: &str) -> Result<EmployeeId, axum::response::Response> {
    EmployeeId::from_str(s).map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_employee_id", e.to_string())
    })
}

pub fn parse_rfc3339(param: &str, s: &str) -> Result<DateTime<Utc>, axum::response::Response> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_date",
                format!("{param} must be an RFC 3339 timestamp"),
            )
        })
}

pub fn balances_to_json(balances: &BalanceSheet) -> serde_json::Value {
    json!({
        "cash": balances.cash,
        "ledger": balances.ledger,
        "wallet": balances.wallet,
        "main": balances.main(),
    })
}

/// Render a stored transaction, joining the borrowing counterparty's name
/// when the caller resolved one.
pub fn stored_transaction_to_json(
    stored: &StoredTransaction,
    employee: Option<&Employee>,
) -> serde_json::Value {
    let record = &stored.record;
    json!({
        "sequence": stored.sequence,
        "kind": record.kind.as_str(),
        "amount": record.amount,
        "charge": record.charge,
        "profit": record.profit,
        "payment_method": record.payment_method.map(|m| m.as_str()),
        "employee_id": record.employee_id.map(|id| id.to_string()),
        "employee_name": employee.map(|e| e.name().to_string()),
        "note": record.note,
        "balances": balances_to_json(&record.balances),
        "recorded_at": record.recorded_at,
    })
}

pub fn employee_to_json(employee: &Employee) -> serde_json::Value {
    json!({
        "id": employee.id().to_string(),
        "name": employee.name(),
        "phone": employee.contact().phone,
        "address": employee.contact().address,
        "status": employee.status(),
        "registered_at": employee.registered_at(),
    })
}
