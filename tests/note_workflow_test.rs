mod common;

use assert_matches::assert_matches;
use cartridge_api::{
    entities::{
        cartridge::Entity as Cartridge,
        cartridge_location::{self, Entity as CartridgeLocation},
        cartridge_movement::{self, Entity as CartridgeMovement},
        service_note::{self, NoteStatus},
        storage_box::Entity as StorageBox,
    },
    errors::ServiceError,
    services::{
        catalog::CreateBox,
        notes::IssueNoteCommand,
    },
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

fn issue_command(fx: &common::Fixture, quantity: i32) -> IssueNoteCommand {
    IssueNoteCommand {
        author_id: fx.author_id,
        recipient_id: fx.recipient_id,
        cartridge_id: fx.cartridge_id,
        quantity,
        reason: "Printer repair".to_string(),
        comment: None,
    }
}

#[tokio::test]
async fn issue_writes_units_off_the_books() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();

    let note = ctx.notes.issue(issue_command(&fx, 4)).await.unwrap();
    assert_eq!(note.status, NoteStatus::Issued);
    assert_eq!(note.quantity, 4);
    assert_eq!(note.box_id, fx.box_id);
    assert_eq!(
        note.note_number,
        format!("CART-{}-001", Utc::now().year())
    );

    let bucket = CartridgeLocation::find()
        .filter(cartridge_location::Column::CartridgeId.eq(fx.cartridge_id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.quantity, 6);

    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 6);

    let cartridge = Cartridge::find_by_id(fx.cartridge_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cartridge.total_quantity, 6);

    let movement = CartridgeMovement::find()
        .filter(cartridge_movement::Column::ServiceNoteId.eq(note.id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.from_location, "Box A-01");
    assert_eq!(movement.to_location, "Employee: Petrova Maria Sergeevna");
}

#[tokio::test]
async fn issue_deletes_emptied_bucket() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 3, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();

    ctx.notes.issue(issue_command(&fx, 3)).await.unwrap();

    let buckets = CartridgeLocation::find().count(ctx.db.as_ref()).await.unwrap();
    assert_eq!(buckets, 0);
}

#[tokio::test]
async fn issue_requires_a_single_covering_box() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 7, 20).await;
    let second = ctx
        .catalog
        .create_box(CreateBox {
            warehouse_id: fx.warehouse_id,
            box_number: "A-02".to_string(),
            description: None,
            capacity: Some(20),
        })
        .await
        .unwrap();
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();
    ctx.ledger.receive(fx.cartridge_id, second.id, 4).await.unwrap();

    // Seven units exist in total but no single box holds five.
    let err = ctx.notes.issue(issue_command(&fx, 5)).await.unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));

    let cartridge = Cartridge::find_by_id(fx.cartridge_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cartridge.total_quantity, 7, "failed issue must not write");
}

#[tokio::test]
async fn issue_picks_the_largest_bucket() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 9, 20).await;
    let second = ctx
        .catalog
        .create_box(CreateBox {
            warehouse_id: fx.warehouse_id,
            box_number: "A-02".to_string(),
            description: None,
            capacity: Some(20),
        })
        .await
        .unwrap();
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();
    ctx.ledger.receive(fx.cartridge_id, second.id, 6).await.unwrap();

    let note = ctx.notes.issue(issue_command(&fx, 5)).await.unwrap();
    assert_eq!(note.box_id, second.id);

    let bucket = CartridgeLocation::find()
        .filter(cartridge_location::Column::BoxId.eq(second.id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.quantity, 1);
    let untouched = CartridgeLocation::find()
        .filter(cartridge_location::Column::BoxId.eq(fx.box_id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.quantity, 3);
}

#[tokio::test]
async fn issue_rejects_more_than_total() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 2, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 2).await.unwrap();

    let err = ctx.notes.issue(issue_command(&fx, 3)).await.unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));
}

#[tokio::test]
async fn issue_validates_quantity_and_references() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 5, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 5).await.unwrap();

    let err = ctx.notes.issue(issue_command(&fx, 0)).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let mut command = issue_command(&fx, 1);
    command.recipient_id = 999;
    let err = ctx.notes.issue(command).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let mut command = issue_command(&fx, 1);
    command.cartridge_id = 999;
    let err = ctx.notes.issue(command).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn return_restores_stock_but_not_totals() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();
    let note = ctx.notes.issue(issue_command(&fx, 4)).await.unwrap();

    let returned = ctx.notes.return_note(note.id).await.unwrap();
    assert_eq!(returned.status, NoteStatus::Returned);

    let bucket = CartridgeLocation::find()
        .filter(cartridge_location::Column::CartridgeId.eq(fx.cartridge_id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.quantity, 10);
    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 10);

    // Returned units come back to the box but stay written off the books.
    let cartridge = Cartridge::find_by_id(fx.cartridge_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cartridge.total_quantity, 6);

    let movement = CartridgeMovement::find()
        .filter(cartridge_movement::Column::FromLocation.eq("In use"))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.to_location, "Box A-01");
    assert_eq!(movement.service_note_id, Some(note.id));
}

#[tokio::test]
async fn return_recreates_bucket_when_emptied() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 3, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();
    let note = ctx.notes.issue(issue_command(&fx, 3)).await.unwrap();

    ctx.notes.return_note(note.id).await.unwrap();

    let bucket = CartridgeLocation::find()
        .filter(cartridge_location::Column::BoxId.eq(fx.box_id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.quantity, 3);
}

#[tokio::test]
async fn return_is_rejected_twice() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();
    let note = ctx.notes.issue(issue_command(&fx, 4)).await.unwrap();

    ctx.notes.return_note(note.id).await.unwrap();
    let err = ctx.notes.return_note(note.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    // No double credit.
    let bucket = CartridgeLocation::find()
        .filter(cartridge_location::Column::CartridgeId.eq(fx.cartridge_id))
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.quantity, 10);
}

#[tokio::test]
async fn return_unknown_note() {
    let ctx = common::setup().await;
    common::base_fixture(&ctx, 10, 20).await;

    let err = ctx.notes.return_note(12345).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn note_numbers_increment_within_the_year() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();

    let year = Utc::now().year();
    for seq in 1..=3 {
        let note = ctx.notes.issue(issue_command(&fx, 1)).await.unwrap();
        assert_eq!(note.note_number, format!("CART-{}-{:03}", year, seq));
    }
}

#[tokio::test]
async fn note_numbers_ignore_previous_years() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();

    // A leftover note from an earlier year must not shift this year's sequence.
    service_note::ActiveModel {
        note_number: Set("CART-2020-001".to_string()),
        created_date: Set(NaiveDate::from_ymd_opt(2020, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()),
        author_id: Set(fx.author_id),
        recipient_id: Set(fx.recipient_id),
        cartridge_id: Set(fx.cartridge_id),
        quantity: Set(1),
        box_id: Set(fx.box_id),
        reason: Set("Archive".to_string()),
        comment: Set(None),
        status: Set(NoteStatus::Returned),
        ..Default::default()
    }
    .insert(ctx.db.as_ref())
    .await
    .unwrap();

    let note = ctx.notes.issue(issue_command(&fx, 1)).await.unwrap();
    assert_eq!(
        note.note_number,
        format!("CART-{}-001", Utc::now().year())
    );
}

#[tokio::test]
async fn list_notes_newest_first() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();

    let first = ctx.notes.issue(issue_command(&fx, 1)).await.unwrap();
    let second = ctx.notes.issue(issue_command(&fx, 1)).await.unwrap();

    let notes = ctx.notes.list_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    let ids: Vec<i32> = notes.iter().map(|n| n.id).collect();
    assert!(ids.contains(&first.id) && ids.contains(&second.id));
}
