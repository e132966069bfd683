use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A service note documenting one transfer of cartridges to an employee.
///
/// Immutable once issued, except for the `issued -> returned` transition.
/// `note_number` is unique per calendar year, formatted
/// `CART-<year>-<three digit sequence>`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub note_number: String,
    pub created_date: DateTime,
    pub author_id: i32,
    pub recipient_id: i32,
    pub cartridge_id: i32,
    pub quantity: i32,
    pub box_id: i32,
    pub reason: String,
    pub comment: Option<String>,
    pub status: NoteStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum NoteStatus {
    /// Schema default; no operation currently lands a note here.
    #[sea_orm(string_value = "requested")]
    Requested,
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Terminal state.
    #[sea_orm(string_value = "returned")]
    Returned,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::AuthorId",
        to = "super::employee::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::RecipientId",
        to = "super::employee::Column::Id"
    )]
    Recipient,
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

impl ActiveModelBehavior for ActiveModel {}
