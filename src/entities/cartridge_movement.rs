use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit row describing a from/to transfer of cartridge stock.
///
/// Never updated or deleted, except as a cascade of cartridge deletion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cartridge_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cartridge_id: i32,
    pub from_location: String,
    pub to_location: String,
    pub movement_date: DateTime,
    pub service_note_id: Option<i32>,
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
        belongs_to = "super::service_note::Entity",
        from = "Column::ServiceNoteId",
        to = "super::service_note::Column::Id"
    )]
    ServiceNote,
}

impl Related<super::cartridge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cartridge.def()
    }
}

impl Related<super::service_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceNote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
