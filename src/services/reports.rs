use crate::{
    db::DbPool,
    entities::{
        cartridge_location::{self, Entity as CartridgeLocation, LocationStatus},
        cartridge_movement::{self, Entity as CartridgeMovement},
        department::{self, Entity as Department},
        service_note::{self, Entity as ServiceNote, NoteStatus},
        storage_box::{self, Entity as StorageBox},
        warehouse,
    },
    errors::ServiceError,
};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use std::sync::Arc;

/// In-stock totals for one box, with its warehouse.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct BoxInventoryRow {
    pub box_id: i32,
    pub box_number: String,
    pub warehouse_name: String,
    pub total_in_stock: i64,
}

/// Issued-note count per department, via the recipient -> employee ->
/// department join.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct DepartmentNotesRow {
    pub department: String,
    pub notes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_in_stock: i64,
    pub in_use: i64,
    pub recent_notes: Vec<service_note::Model>,
    pub low_stock_boxes: Vec<storage_box::Model>,
}

/// Read-only aggregations over the ledger. No mutation happens here.
#[derive(Clone)]
pub struct ReportsService {
    db_pool: Arc<DbPool>,
    low_stock_threshold: i32,
}

impl ReportsService {
    pub fn new(db_pool: Arc<DbPool>, low_stock_threshold: i32) -> Self {
        Self {
            db_pool,
            low_stock_threshold,
        }
    }

    /// Stock per box with the warehouse name. Boxes holding no in-stock
    /// buckets are omitted, matching the grouped join semantics.
    pub async fn box_inventory(&self) -> Result<Vec<BoxInventoryRow>, ServiceError> {
        let rows = StorageBox::find()
            .select_only()
            .column_as(storage_box::Column::Id, "box_id")
            .column_as(storage_box::Column::BoxNumber, "box_number")
            .column_as(warehouse::Column::Name, "warehouse_name")
            .column_as(cartridge_location::Column::Quantity.sum(), "total_in_stock")
            .join(JoinType::InnerJoin, storage_box::Relation::Warehouse.def())
            .join(JoinType::LeftJoin, storage_box::Relation::Locations.def())
            .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
            .group_by(storage_box::Column::Id)
            .group_by(storage_box::Column::BoxNumber)
            .group_by(warehouse::Column::Name)
            .into_model::<BoxInventoryRow>()
            .all(self.db_pool.as_ref())
            .await?;
        Ok(rows)
    }

    pub async fn department_note_counts(&self) -> Result<Vec<DepartmentNotesRow>, ServiceError> {
        let rows = Department::find()
            .select_only()
            .column_as(department::Column::Name, "department")
            .column_as(service_note::Column::Id.count(), "notes_count")
            .join(JoinType::InnerJoin, department::Relation::Employees.def())
            .join(
                JoinType::InnerJoin,
                service_note::Relation::Recipient.def().rev(),
            )
            .group_by(department::Column::Id)
            .group_by(department::Column::Name)
            .into_model::<DepartmentNotesRow>()
            .all(self.db_pool.as_ref())
            .await?;
        Ok(rows)
    }

    /// Boxes whose occupancy fell below the configured threshold.
    pub async fn low_stock_boxes(&self) -> Result<Vec<storage_box::Model>, ServiceError> {
        Ok(StorageBox::find()
            .filter(storage_box::Column::CurrentCount.lt(self.low_stock_threshold))
            .all(self.db_pool.as_ref())
            .await?)
    }

    pub async fn recent_movements(
        &self,
        limit: u64,
    ) -> Result<Vec<cartridge_movement::Model>, ServiceError> {
        Ok(CartridgeMovement::find()
            .order_by_desc(cartridge_movement::Column::MovementDate)
            .limit(limit)
            .all(self.db_pool.as_ref())
            .await?)
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let db = self.db_pool.as_ref();

        let locations = CartridgeLocation::find()
            .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
            .all(db)
            .await?;
        let total_in_stock = locations.iter().map(|l| i64::from(l.quantity)).sum();

        // Units out with employees: issued notes that were never returned.
        let in_use = ServiceNote::find()
            .filter(service_note::Column::Status.eq(NoteStatus::Issued))
            .all(db)
            .await?
            .iter()
            .map(|n| i64::from(n.quantity))
            .sum();

        let recent_notes = ServiceNote::find()
            .order_by_desc(service_note::Column::CreatedDate)
            .limit(5)
            .all(db)
            .await?;
        let low_stock_boxes = self.low_stock_boxes().await?;

        Ok(DashboardSummary {
            total_in_stock,
            in_use,
            recent_notes,
            low_stock_boxes,
        })
    }
}
