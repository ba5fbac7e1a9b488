use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use shopdesk_auth::Permission;
use shopdesk_core::{DomainError, PrincipalId};
use shopdesk_infra::StaffDirectoryError;
use shopdesk_staff::{ContactInfo, Employee};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_employee).get(list_employees))
        .route("/:id/grants", post(grant_permission))
}

pub async fn register_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RegisterEmployeeRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("staff.manage"),
    ) {
        return resp;
    }

    let contact = ContactInfo {
        phone: body.phone,
        address: body.address,
    };
    let employee = match Employee::register(body.name, Some(contact), Utc::now()) {
        Ok(e) => e,
        Err(DomainError::Validation(msg)) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation", msg)
        }
        Err(e) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string())
        }
    };

    match services.directory.insert(employee.clone()) {
        Ok(()) => {}
        Err(StaffDirectoryError::Duplicate(id)) => {
            return errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                format!("employee already registered: {id}"),
            )
        }
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "directory_error",
                e.to_string(),
            )
        }
    }

    (StatusCode::CREATED, Json(dto::employee_to_json(&employee))).into_response()
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("staff.manage"),
    ) {
        return resp;
    }

    let employees = match services.directory.list() {
        Ok(all) => all,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "directory_error",
                e.to_string(),
            )
        }
    };

    let items: Vec<_> = employees.iter().map(dto::employee_to_json).collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Grant an operation permission to an employee's principal.
///
/// Employees authenticate with their employee id as the token subject, so
/// the grant is keyed by that id directly.
pub async fn grant_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::GrantPermissionRequest>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::authorize_operation(
        services.grants.as_ref(),
        &principal,
        &Permission::new("staff.manage"),
    ) {
        return resp;
    }

    let employee_id = match dto::parse_employee_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.get(employee_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "employee not found")
        }
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "directory_error",
                e.to_string(),
            )
        }
    }

    let permission = Permission::new(body.permission);
    if let Err(e) = services
        .grants
        .grant(PrincipalId::from(employee_id), permission.clone())
    {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "grant_store_error",
            e.to_string(),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "employee_id": employee_id.to_string(),
            "permission": permission.as_str(),
        })),
    )
        .into_response()
}
