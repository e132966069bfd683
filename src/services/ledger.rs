use crate::{
    db::DbPool,
    entities::{
        cartridge::Entity as Cartridge,
        cartridge_location::{self, Entity as CartridgeLocation, LocationStatus},
        cartridge_movement,
        storage_box::{self, Entity as StorageBox},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;

/// Movement label for a box.
pub(crate) fn box_label(storage: &storage_box::Model) -> String {
    format!("Box {}", storage.box_number)
}

pub(crate) const INTAKE_LABEL: &str = "Intake";
pub(crate) const UNDISTRIBUTED_LABEL: &str = "Undistributed";
pub(crate) const IN_USE_LABEL: &str = "In use";

/// Sum of in-stock location quantities for a cartridge, i.e. how many of its
/// units are already placed in boxes.
pub(crate) async fn distributed_quantity<C: ConnectionTrait>(
    db: &C,
    cartridge_id: i32,
) -> Result<i32, ServiceError> {
    let rows = CartridgeLocation::find()
        .filter(cartridge_location::Column::CartridgeId.eq(cartridge_id))
        .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
        .all(db)
        .await?;
    Ok(rows.iter().map(|row| row.quantity).sum())
}

/// Appends one row to the append-only movement log.
pub(crate) async fn record_movement<C: ConnectionTrait>(
    db: &C,
    cartridge_id: i32,
    from: &str,
    to: &str,
    service_note_id: Option<i32>,
) -> Result<(), ServiceError> {
    cartridge_movement::ActiveModel {
        cartridge_id: Set(cartridge_id),
        from_location: Set(from.to_string()),
        to_location: Set(to.to_string()),
        movement_date: Set(Utc::now().naive_utc()),
        service_note_id: Set(service_note_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// The quantity-tracking core: moves cartridge units between the
/// undistributed pool, boxed stock, and the issued state while keeping
/// cartridge totals, box occupancy, and the movement log consistent.
///
/// Every operation runs as a single transaction and checks all of its
/// preconditions before the first write.
#[derive(Clone)]
pub struct LedgerService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl LedgerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Places `quantity` undistributed units of a cartridge into a box.
    ///
    /// Merges into the existing in-stock row for the (cartridge, box) pair
    /// when one exists, otherwise creates it. Fails with `InsufficientStock`
    /// when fewer undistributed units remain, `BoxFull` when the box lacks
    /// free slots.
    #[instrument(skip(self))]
    pub async fn receive(
        &self,
        cartridge_id: i32,
        box_id: i32,
        quantity: i32,
    ) -> Result<cartridge_location::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be positive".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let location = db
            .transaction::<_, cartridge_location::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let cartridge = Cartridge::find_by_id(cartridge_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Cartridge {} not found", cartridge_id))
                        })?;

                    let distributed = distributed_quantity(txn, cartridge_id).await?;
                    let available = cartridge.total_quantity - distributed;
                    if quantity > available {
                        return Err(ServiceError::InsufficientStock(format!(
                            "only {} undistributed unit(s) of {} available",
                            available.max(0),
                            cartridge.article
                        )));
                    }

                    let storage = StorageBox::find_by_id(box_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Box {} not found", box_id))
                        })?;
                    if quantity > storage.free_capacity() {
                        return Err(ServiceError::BoxFull(format!(
                            "box {} has only {} free slot(s)",
                            storage.box_number,
                            storage.free_capacity().max(0)
                        )));
                    }

                    let existing = CartridgeLocation::find()
                        .filter(cartridge_location::Column::CartridgeId.eq(cartridge_id))
                        .filter(cartridge_location::Column::BoxId.eq(box_id))
                        .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
                        .one(txn)
                        .await?;

                    let location = match existing {
                        Some(row) => {
                            let merged = row.quantity + quantity;
                            let mut active: cartridge_location::ActiveModel = row.into();
                            active.quantity = Set(merged);
                            active.update(txn).await?
                        }
                        None => {
                            cartridge_location::ActiveModel {
                                cartridge_id: Set(cartridge_id),
                                box_id: Set(Some(box_id)),
                                employee_id: Set(None),
                                status: Set(LocationStatus::InStock),
                                placed_date: Set(Utc::now().naive_utc()),
                                quantity: Set(quantity),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?
                        }
                    };

                    let occupied = storage.current_count + quantity;
                    let label = box_label(&storage);
                    let mut box_active: storage_box::ActiveModel = storage.into();
                    box_active.current_count = Set(occupied);
                    box_active.update(txn).await?;

                    record_movement(txn, cartridge_id, INTAKE_LABEL, &label, None).await?;

                    Ok(location)
                })
            })
            .await?;

        self.event_sender
            .send(Event::StockReceived {
                cartridge_id,
                box_id,
                quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(location)
    }

    /// Removes exactly one unit from an in-stock location, returning it to
    /// the undistributed pool. The row is deleted once its quantity reaches
    /// zero; box occupancy is decremented, floored at zero.
    #[instrument(skip(self))]
    pub async fn withdraw_one(&self, location_id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let cartridge_and_box = db
            .transaction::<_, (i32, Option<i32>), ServiceError>(move |txn| {
                Box::pin(async move {
                    let location = CartridgeLocation::find_by_id(location_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Location {} not found", location_id))
                        })?;
                    if location.status != LocationStatus::InStock {
                        return Err(ServiceError::InvalidOperation(format!(
                            "location {} is not in stock",
                            location_id
                        )));
                    }

                    let cartridge_id = location.cartridge_id;
                    let box_id = location.box_id;
                    let remaining = location.quantity - 1;

                    if remaining <= 0 {
                        location.delete(txn).await?;
                    } else {
                        let mut active: cartridge_location::ActiveModel = location.into();
                        active.quantity = Set(remaining);
                        active.update(txn).await?;
                    }

                    let mut from_label = UNDISTRIBUTED_LABEL.to_string();
                    if let Some(box_id) = box_id {
                        if let Some(storage) = StorageBox::find_by_id(box_id).one(txn).await? {
                            from_label = box_label(&storage);
                            let occupied = (storage.current_count - 1).max(0);
                            let mut box_active: storage_box::ActiveModel = storage.into();
                            box_active.current_count = Set(occupied);
                            box_active.update(txn).await?;
                        }
                    }

                    record_movement(txn, cartridge_id, &from_label, UNDISTRIBUTED_LABEL, None)
                        .await?;

                    Ok((cartridge_id, box_id))
                })
            })
            .await?;

        self.event_sender
            .send(Event::StockWithdrawn {
                cartridge_id: cartridge_and_box.0,
                box_id: cartridge_and_box.1.unwrap_or_default(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
