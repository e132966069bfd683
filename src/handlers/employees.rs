use super::common::{form_result, map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateEmployee, UpdateEmployee},
};
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/:id", get(get_employee))
        .route("/:id/edit", post(edit_employee))
        .route("/:id/delete", post(delete_employee))
}

async fn list_employees(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let employees = state
        .services
        .catalog
        .list_employees()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(employees))
}

async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .services
        .catalog
        .get_employee(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Employee {} not found", id)))?;
    Ok(success_response(employee))
}

/// Department auto-fill lookup used by the note form.
pub async fn employee_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let name = state
        .services
        .catalog
        .employee_department_name(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "department_name": name })))
}

async fn create_employee(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateEmployee>,
) -> Response {
    let result = state
        .services
        .catalog
        .create_employee(payload)
        .await
        .map(|e| info!("Employee created: {}", e.id));
    form_result(result, "/employees")
}

async fn edit_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateEmployee>,
) -> Response {
    let result = state
        .services
        .catalog
        .update_employee(id, payload)
        .await
        .map(|_| ());
    form_result(result, "/employees")
}

async fn delete_employee(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(
        state.services.catalog.delete_employee(id).await,
        "/employees",
    )
}
