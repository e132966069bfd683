use super::common::{form_result, map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateWarehouse, UpdateWarehouse},
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
        .route("/", get(list_warehouses).post(create_warehouse))
        .route("/:id", get(get_warehouse))
        .route("/:id/edit", post(edit_warehouse))
        .route("/:id/delete", post(delete_warehouse))
}

async fn list_warehouses(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouses = state
        .services
        .catalog
        .list_warehouses()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(warehouses))
}

async fn get_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .catalog
        .get_warehouse(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Warehouse {} not found", id)))?;
    Ok(success_response(warehouse))
}

async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateWarehouse>,
) -> Response {
    let result = state
        .services
        .catalog
        .create_warehouse(payload)
        .await
        .map(|w| info!("Warehouse created: {}", w.id));
    form_result(result, "/warehouses")
}

async fn edit_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateWarehouse>,
) -> Response {
    let result = state
        .services
        .catalog
        .update_warehouse(id, payload)
        .await
        .map(|_| ());
    form_result(result, "/warehouses")
}

async fn delete_warehouse(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(
        state.services.catalog.delete_warehouse(id).await,
        "/warehouses",
    )
}
