use axum::{routing::get, Router};

pub mod employees;
pub mod system;
pub mod transactions;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/balances", get(transactions::current_balances))
        .nest("/transactions", transactions::router())
        .nest("/employees", employees::router())
}
