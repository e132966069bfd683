use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    #[serde(default = "default_movement_limit")]
    pub limit: u64,
}

fn default_movement_limit() -> u64 {
    20
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory", get(box_inventory))
        .route("/departments", get(department_note_counts))
        .route("/low-stock", get(low_stock))
        .route("/movements", get(recent_movements))
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .reports
        .dashboard()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(summary))
}

async fn box_inventory(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .box_inventory()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

async fn department_note_counts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .department_note_counts()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

async fn low_stock(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let boxes = state
        .services
        .reports
        .low_stock_boxes()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(boxes))
}

async fn recent_movements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = state
        .services
        .reports
        .recent_movements(query.limit)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(movements))
}
