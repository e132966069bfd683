use super::common::{form_result, map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateBox, UpdateBox},
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
        .route("/", get(list_boxes).post(create_box))
        .route("/:id", get(get_box))
        .route("/:id/edit", post(edit_box))
        .route("/:id/delete", post(delete_box))
}

async fn list_boxes(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let boxes = state
        .services
        .catalog
        .list_boxes()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(boxes))
}

async fn get_box(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let storage_box = state
        .services
        .catalog
        .get_box(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Box {} not found", id)))?;
    Ok(success_response(storage_box))
}

async fn create_box(State(state): State<Arc<AppState>>, Form(payload): Form<CreateBox>) -> Response {
    let result = state
        .services
        .catalog
        .create_box(payload)
        .await
        .map(|b| info!("Box created: {} ({})", b.id, b.box_number));
    form_result(result, "/warehouses")
}

async fn edit_box(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateBox>,
) -> Response {
    let result = state.services.catalog.update_box(id, payload).await.map(|_| ());
    form_result(result, "/warehouses")
}

async fn delete_box(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(state.services.catalog.delete_box(id).await, "/warehouses")
}
