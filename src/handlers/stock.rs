use super::common::{form_result, map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReceiveStockForm {
    pub cartridge_id: i32,
    pub box_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_locations).post(receive_stock))
        .route("/:id/withdraw", post(withdraw_one))
}

/// In-stock location buckets, for the intake and note forms.
async fn list_locations(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let locations = state
        .services
        .catalog
        .list_in_stock_locations()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(locations))
}

/// Places undistributed units of a cartridge into a box.
async fn receive_stock(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<ReceiveStockForm>,
) -> Response {
    let result = state
        .services
        .ledger
        .receive(payload.cartridge_id, payload.box_id, payload.quantity)
        .await
        .map(|_| ());
    form_result(result, "/warehouses")
}

/// Removes one unit from a bucket back to the undistributed pool.
async fn withdraw_one(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    form_result(state.services.ledger.withdraw_one(id).await, "/warehouses")
}
