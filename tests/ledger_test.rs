mod common;

use assert_matches::assert_matches;
use cartridge_api::{
    entities::{
        cartridge::Entity as Cartridge,
        cartridge_location::{self, Entity as CartridgeLocation},
        cartridge_movement::{self, Entity as CartridgeMovement},
        storage_box::Entity as StorageBox,
    },
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn receive_places_stock_and_updates_occupancy() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    let location = ctx
        .ledger
        .receive(fx.cartridge_id, fx.box_id, 10)
        .await
        .expect("receive should succeed");
    assert_eq!(location.quantity, 10);
    assert_eq!(location.box_id, Some(fx.box_id));

    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 10);

    let movements = CartridgeMovement::find().all(ctx.db.as_ref()).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].from_location, "Intake");
    assert_eq!(movements[0].to_location, "Box A-01");
    assert_eq!(movements[0].service_note_id, None);
}

#[tokio::test]
async fn receive_merges_into_existing_bucket() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 4).await.unwrap();
    let merged = ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();
    assert_eq!(merged.quantity, 7);

    let rows = CartridgeLocation::find()
        .filter(cartridge_location::Column::CartridgeId.eq(fx.cartridge_id))
        .all(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "merging must not create a second bucket");
}

#[tokio::test]
async fn receive_rejects_more_than_undistributed() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 5, 20).await;

    let err = ctx
        .ledger
        .receive(fx.cartridge_id, fx.box_id, 6)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // Nothing may have been written.
    let rows = CartridgeLocation::find().count(ctx.db.as_ref()).await.unwrap();
    assert_eq!(rows, 0);
    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 0);
    let movements = CartridgeMovement::find().count(ctx.db.as_ref()).await.unwrap();
    assert_eq!(movements, 0);
}

#[tokio::test]
async fn receive_respects_already_distributed_units() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 5, 20).await;

    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 3).await.unwrap();
    let err = ctx
        .ledger
        .receive(fx.cartridge_id, fx.box_id, 3)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));
}

#[tokio::test]
async fn receive_rejects_overfull_box() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 5).await;

    let err = ctx
        .ledger
        .receive(fx.cartridge_id, fx.box_id, 6)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::BoxFull(_));

    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 0);
}

#[tokio::test]
async fn receive_rejects_nonpositive_quantity() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    let err = ctx
        .ledger
        .receive(fx.cartridge_id, fx.box_id, 0)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn receive_unknown_cartridge_or_box() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    let err = ctx.ledger.receive(999, fx.box_id, 1).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
    let err = ctx.ledger.receive(fx.cartridge_id, 999, 1).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn withdraw_decrements_bucket_and_occupancy() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    let location = ctx.ledger.receive(fx.cartridge_id, fx.box_id, 2).await.unwrap();

    ctx.ledger.withdraw_one(location.id).await.unwrap();

    let row = CartridgeLocation::find_by_id(location.id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.quantity, 1);
    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 1);

    // The withdrawn unit goes back to the undistributed pool, so it can be
    // placed again.
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 1).await.unwrap();

    let movements = CartridgeMovement::find()
        .filter(cartridge_movement::Column::ToLocation.eq("Undistributed"))
        .all(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].from_location, "Box A-01");
}

#[tokio::test]
async fn withdraw_deletes_bucket_at_zero() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    let location = ctx.ledger.receive(fx.cartridge_id, fx.box_id, 1).await.unwrap();

    ctx.ledger.withdraw_one(location.id).await.unwrap();

    let rows = CartridgeLocation::find().count(ctx.db.as_ref()).await.unwrap();
    assert_eq!(rows, 0, "zero-quantity buckets must not persist");
    let storage = StorageBox::find_by_id(fx.box_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(storage.current_count, 0);
}

#[tokio::test]
async fn withdraw_unknown_location() {
    let ctx = common::setup().await;
    common::base_fixture(&ctx, 10, 20).await;

    let err = ctx.ledger.withdraw_one(424242).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn ledger_never_touches_cartridge_totals() {
    let ctx = common::setup().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    let location = ctx.ledger.receive(fx.cartridge_id, fx.box_id, 5).await.unwrap();
    ctx.ledger.withdraw_one(location.id).await.unwrap();

    let cartridge = Cartridge::find_by_id(fx.cartridge_id)
        .one(ctx.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cartridge.total_quantity, 10);
}
