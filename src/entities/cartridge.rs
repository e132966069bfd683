use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A cartridge type in the catalog.
///
/// `total_quantity` is the authoritative count of units owned across all
/// locations; `initial_quantity` is the historical baseline recorded when the
/// cartridge was first registered.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cartridges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub article: String,
    pub model: String,
    pub printer_type: Option<String>,
    pub color: Option<String>,
    pub status: String,
    /// Rated page yield, when known.
    pub capacity: Option<i32>,
    pub initial_quantity: i32,
    pub total_quantity: i32,
    pub production_date: Option<Date>,
    pub warranty_months: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cartridge_location::Entity")]
    Locations,
    #[sea_orm(has_many = "super::service_note::Entity")]
    ServiceNotes,
    #[sea_orm(has_many = "super::cartridge_movement::Entity")]
    Movements,
}

impl Related<super::cartridge_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::service_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceNotes.def()
    }
}

impl Related<super::cartridge_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
