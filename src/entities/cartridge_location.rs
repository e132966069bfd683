use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A quantity bucket of one cartridge type grouped in one box.
///
/// At most one in-stock row exists per (cartridge, box) pair; the ledger
/// merges on insert instead of relying on a uniqueness constraint. Rows with
/// `quantity <= 0` are deleted rather than persisted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cartridge_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cartridge_id: i32,
    pub box_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub status: LocationStatus,
    pub placed_date: DateTime,
    pub quantity: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum LocationStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "issued")]
    Issued,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cartridge::Entity",
        from = "Column::CartridgeId",
        to = "super::cartridge::Column::Id"
    )]
    Cartridge,
    #[sea_orm(
        belongs_to = "super::storage_box::Entity",
        from = "Column::BoxId",
        to = "super::storage_box::Column::Id"
    )]
    Box,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::cartridge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cartridge.def()
    }
}

impl Related<super::storage_box::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Box.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
