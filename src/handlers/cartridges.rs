use super::common::{form_result, map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateCartridge, UpdateCartridge},
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
        .route("/", get(list_cartridges).post(create_cartridge))
        .route("/:id", get(get_cartridge))
        .route("/:id/edit", post(edit_cartridge))
        .route("/:id/delete", post(delete_cartridge))
}

async fn list_cartridges(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let cartridges = state
        .services
        .catalog
        .list_cartridges()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(cartridges))
}

async fn get_cartridge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let cartridge = state
        .services
        .catalog
        .get_cartridge(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Cartridge {} not found", id)))?;
    Ok(success_response(cartridge))
}

async fn create_cartridge(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateCartridge>,
) -> Response {
    let result = state
        .services
        .catalog
        .create_cartridge(payload)
        .await
        .map(|c| info!("Cartridge created: {} ({})", c.id, c.article));
    form_result(result, "/cartridges")
}

async fn edit_cartridge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateCartridge>,
) -> Response {
    let result = state
        .services
        .catalog
        .update_cartridge(id, payload)
        .await
        .map(|_| ());
    form_result(result, "/cartridges")
}

async fn delete_cartridge(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(
        state.services.catalog.delete_cartridge(id).await,
        "/cartridges",
    )
}
