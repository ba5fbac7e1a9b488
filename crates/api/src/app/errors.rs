use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopdesk_banking::EvaluationError;
use shopdesk_infra::TransactionLogError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map an evaluator rejection onto a stable error code.
///
/// Every rejection is a 400 with a rule-specific code; the evaluator never
/// partially applies a transition, so there is nothing else to report.
pub fn evaluation_error_to_response(err: EvaluationError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        EvaluationError::NonPositiveAmount => {
            json_error(StatusCode::BAD_REQUEST, "invalid_amount", message)
        }
        EvaluationError::MissingCounterparty => {
            json_error(StatusCode::BAD_REQUEST, "missing_employee", message)
        }
        EvaluationError::InvalidPaymentMethod(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_payment_method", message)
        }
        EvaluationError::NegativeCharge { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_charge", message)
        }
        EvaluationError::BelowMinimumTransferAmount => {
            json_error(StatusCode::BAD_REQUEST, "amount_below_minimum", message)
        }
        EvaluationError::InsufficientFunds { .. } => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_funds", message)
        }
    }
}

pub fn log_error_to_response(err: TransactionLogError) -> axum::response::Response {
    match err {
        TransactionLogError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        TransactionLogError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}
