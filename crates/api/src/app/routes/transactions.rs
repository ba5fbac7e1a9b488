use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use shopdesk_auth::Permission;
use shopdesk_banking::{evaluate, BalanceSheet, TransactionRequest};
use shopdesk_core::ExpectedSequence;
use shopdesk_infra::{TransactionFilter, TransactionLogError};
use shopdesk_staff::Employee;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Bounded retries for the evaluate-then-append race. Contention on a
/// single-shop log is rare; persistent failure surfaces as 409.
const APPEND_ATTEMPTS: u32 = 3;

pub fn router() -> Router {
    Router::new().route("/", post(create_transaction).get(list_transactions))
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateTransactionRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("banking.transactions.create"),
    ) {
        return resp;
    }

    let kind = match dto::parse_transaction_kind(&body.kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    let payment_method = match body.payment_method.as_deref() {
        Some(s) => match dto::parse_payment_method(s) {
            Ok(m) => Some(m),
            Err(resp) => return resp,
        },
        None => None,
    };

    let employee_id = match body.employee_id.as_deref() {
        Some(s) => match dto::parse_employee_id(s) {
            Ok(id) => Some(id),
            Err(resp) => return resp,
        },
        None => None,
    };

    let mut employee: Option<Employee> = None;

    let request = TransactionRequest {
        kind,
        amount: body.amount,
        charge: body.charge,
        payment_method,
        employee_id,
        note: body.note,
    };

    // Evaluate against the latest snapshot and append conditionally on its
    // sequence; a lost race re-evaluates against the new snapshot.
    for _ in 0..APPEND_ATTEMPTS {
        let latest = match services.log.latest() {
            Ok(l) => l,
            Err(e) => return errors::log_error_to_response(e),
        };
        let (current, sequence) = match &latest {
            Some(t) => (t.record.balances, t.sequence),
            None => (BalanceSheet::default(), 0),
        };

        let record = match evaluate(&current, &request, Utc::now()) {
            Ok(r) => r,
            Err(e) => return errors::evaluation_error_to_response(e),
        };

        // Roster lookup runs only once the evaluator accepts the request, so
        // a bad amount answers before an unknown counterparty. Normalization
        // keeps employee_id on borrowings only.
        if employee.is_none() {
            if let Some(id) = record.employee_id {
                employee = match services.directory.get(id) {
                    Ok(found) => found,
                    Err(e) => {
                        return errors::json_error(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "directory_error",
                            e.to_string(),
                        )
                    }
                };
                let Some(found) = &employee else {
                    return errors::json_error(
                        StatusCode::NOT_FOUND,
                        "not_found",
                        "employee not found",
                    );
                };
                if !found.can_borrow() {
                    return errors::json_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "employee_inactive",
                        "inactive employees cannot borrow",
                    );
                }
            }
        }

        match services.log.append(record, ExpectedSequence::Exact(sequence)) {
            Ok(stored) => {
                tracing::info!(
                    kind = stored.record.kind.as_str(),
                    sequence = stored.sequence,
                    "transaction recorded"
                );
                return (
                    StatusCode::CREATED,
                    Json(dto::stored_transaction_to_json(&stored, employee.as_ref())),
                )
                    .into_response();
            }
            Err(TransactionLogError::Concurrency(_)) => continue,
            Err(e) => return errors::log_error_to_response(e),
        }
    }

    errors::json_error(
        StatusCode::CONFLICT,
        "conflict",
        "transaction log contention; retry the request",
    )
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<ListTransactionsQuery>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("banking.transactions.view"),
    ) {
        return resp;
    }

    let mut filter = TransactionFilter::default();
    if let Some(start) = query.start.as_deref() {
        filter.from = match dto::parse_rfc3339("start", start) {
            Ok(t) => Some(t),
            Err(resp) => return resp,
        };
    }
    if let Some(end) = query.end.as_deref() {
        filter.to = match dto::parse_rfc3339("end", end) {
            Ok(t) => Some(t),
            Err(resp) => return resp,
        };
    }

    let stored = match services.log.list(&filter) {
        Ok(s) => s,
        Err(e) => return errors::log_error_to_response(e),
    };

    let mut items = Vec::with_capacity(stored.len());
    for t in &stored {
        let employee = match t.record.employee_id {
            Some(id) => match services.directory.get(id) {
                Ok(found) => found,
                Err(e) => {
                    return errors::json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "directory_error",
                        e.to_string(),
                    )
                }
            },
            None => None,
        };
        items.push(dto::stored_transaction_to_json(t, employee.as_ref()));
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn current_balances(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("banking.transactions.view"),
    ) {
        return resp;
    }

    let latest = match services.log.latest() {
        Ok(l) => l,
        Err(e) => return errors::log_error_to_response(e),
    };
    let balances = latest
        .map(|t| t.record.balances)
        .unwrap_or_default();

    (StatusCode::OK, Json(dto::balances_to_json(&balances))).into_response()
}
