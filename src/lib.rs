//! Cartridge Inventory API Library
//!
//! Tracks printer cartridges moving between warehouse boxes and employees,
//! recording each transfer as an auditable service note.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod docx;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod seed;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Assembles the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(handlers::reports::dashboard))
        .nest("/departments", handlers::departments::routes())
        .nest("/employees", handlers::employees::routes())
        .nest("/cartridges", handlers::cartridges::routes())
        .nest("/warehouses", handlers::warehouses::routes())
        .nest("/boxes", handlers::boxes::routes())
        .nest("/locations", handlers::stock::routes())
        .nest("/service-notes", handlers::service_notes::routes())
        .nest("/reports", handlers::reports::routes())
        .route(
            "/api/employees/:id/department",
            get(handlers::employees::employee_department),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Liveness probe with a database ping.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = match state.db.ping().await {
        Ok(()) => "up",
        Err(_) => "down",
    };
    Json(json!({ "status": "ok", "database": database }))
}
