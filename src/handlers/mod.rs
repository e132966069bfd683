pub mod boxes;
pub mod cartridges;
pub mod common;
pub mod departments;
pub mod employees;
pub mod reports;
pub mod service_notes;
pub mod stock;
pub mod warehouses;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub ledger: Arc<crate::services::ledger::LedgerService>,
    pub notes: Arc<crate::services::notes::NoteService>,
    pub reports: Arc<crate::services::reports::ReportsService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let ledger = Arc::new(crate::services::ledger::LedgerService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let notes = Arc::new(crate::services::notes::NoteService::new(
            db_pool.clone(),
            event_sender,
            config.note_prefix.clone(),
        ));
        let reports = Arc::new(crate::services::reports::ReportsService::new(
            db_pool,
            config.low_stock_threshold,
        ));

        Self {
            catalog,
            ledger,
            notes,
            reports,
        }
    }
}
