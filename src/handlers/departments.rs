use super::common::{form_result, map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateDepartment, UpdateDepartment},
};
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route("/:id", get(get_department))
        .route("/:id/edit", post(edit_department))
        .route("/:id/delete", post(delete_department))
}

async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let departments = state
        .services
        .catalog
        .list_departments()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(departments))
}

async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let department = state
        .services
        .catalog
        .get_department(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Department {} not found", id)))?;
    Ok(success_response(department))
}

async fn create_department(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateDepartment>,
) -> Response {
    let result = state
        .services
        .catalog
        .create_department(payload)
        .await
        .map(|d| info!("Department created: {}", d.id));
    form_result(result, "/departments")
}

async fn edit_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateDepartment>,
) -> Response {
    let result = state
        .services
        .catalog
        .update_department(id, payload)
        .await
        .map(|_| ());
    form_result(result, "/departments")
}

async fn delete_department(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(
        state.services.catalog.delete_department(id).await,
        "/departments",
    )
}
