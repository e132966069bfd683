use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical box inside a warehouse.
///
/// `current_count` tracks occupied slots and must stay within
/// `0..=capacity`; it mirrors the sum of in-stock location quantities held in
/// the box.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub warehouse_id: i32,
    pub box_number: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub current_count: i32,
}

impl Model {
    pub fn free_capacity(&self) -> i32 {
        self.capacity - self.current_count
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_many = "super::cartridge_location::Entity")]
    Locations,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::cartridge_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
