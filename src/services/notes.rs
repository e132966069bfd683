use crate::{
    db::DbPool,
    entities::{
        cartridge::{self, Entity as Cartridge},
        cartridge_location::{self, Entity as CartridgeLocation, LocationStatus},
        employee::Entity as Employee,
        service_note::{self, Entity as ServiceNote, NoteStatus},
        storage_box::{self, Entity as StorageBox},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::ledger::{box_label, record_movement, IN_USE_LABEL},
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;

/// Parameters for issuing cartridges to an employee.
#[derive(Debug, Clone)]
pub struct IssueNoteCommand {
    pub author_id: i32,
    pub recipient_id: i32,
    pub cartridge_id: i32,
    pub quantity: i32,
    pub reason: String,
    pub comment: Option<String>,
}

/// Issues and returns, expressed as ledger transactions plus the append-only
/// movement log. Workflow states: requested -> issued -> returned; creation
/// always lands on "issued" and "returned" is terminal.
#[derive(Clone)]
pub struct NoteService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    note_prefix: String,
}

/// Builds `"<prefix>-<year>-<seq>"` from the count of notes already created
/// this calendar year. Assumes a single writer; not race-free under
/// concurrent creation.
pub(crate) async fn generate_note_number<C: ConnectionTrait>(
    db: &C,
    prefix: &str,
) -> Result<String, ServiceError> {
    let year = Utc::now().year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ServiceError::InternalError("invalid calendar year".to_string()))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ServiceError::InternalError("invalid calendar year".to_string()))?;

    let count = ServiceNote::find()
        .filter(service_note::Column::CreatedDate.gte(start))
        .filter(service_note::Column::CreatedDate.lt(end))
        .count(db)
        .await?;

    Ok(format!("{}-{}-{:03}", prefix, year, count + 1))
}

impl NoteService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, note_prefix: String) -> Self {
        Self {
            db_pool,
            event_sender,
            note_prefix,
        }
    }

    pub async fn get_note(&self, id: i32) -> Result<Option<service_note::Model>, ServiceError> {
        Ok(ServiceNote::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    /// Notes ordered newest first.
    pub async fn list_notes(&self) -> Result<Vec<service_note::Model>, ServiceError> {
        Ok(ServiceNote::find()
            .order_by_desc(service_note::Column::CreatedDate)
            .all(self.db_pool.as_ref())
            .await?)
    }

    /// Issues cartridges to an employee, producing a service note.
    ///
    /// Fulfillment is greedy and single-box: the in-stock location holding
    /// the largest quantity is selected, and the issue fails with
    /// `InsufficientStock` unless that one location covers the whole request.
    /// Splitting one issuance across boxes is deliberately unsupported.
    #[instrument(skip(self, command), fields(cartridge_id = command.cartridge_id, quantity = command.quantity))]
    pub async fn issue(
        &self,
        command: IssueNoteCommand,
    ) -> Result<service_note::Model, ServiceError> {
        if command.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be positive".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let prefix = self.note_prefix.clone();
        let note = db
            .transaction::<_, service_note::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let cartridge = Cartridge::find_by_id(command.cartridge_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Cartridge {} not found",
                                command.cartridge_id
                            ))
                        })?;
                    if cartridge.total_quantity < command.quantity {
                        return Err(ServiceError::InsufficientStock(format!(
                            "only {} unit(s) of {} on the books",
                            cartridge.total_quantity, cartridge.article
                        )));
                    }

                    // Greedy single-box fulfillment: largest in-stock bucket wins.
                    let location = CartridgeLocation::find()
                        .filter(cartridge_location::Column::CartridgeId.eq(command.cartridge_id))
                        .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
                        .order_by_desc(cartridge_location::Column::Quantity)
                        .one(txn)
                        .await?;
                    let location = match location {
                        Some(loc) if loc.quantity >= command.quantity => loc,
                        _ => {
                            return Err(ServiceError::InsufficientStock(format!(
                                "no single box holds {} unit(s) of {}",
                                command.quantity, cartridge.article
                            )))
                        }
                    };
                    let box_id = location.box_id.ok_or_else(|| {
                        ServiceError::InternalError(
                            "in-stock location without a box".to_string(),
                        )
                    })?;

                    let recipient = Employee::find_by_id(command.recipient_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Employee {} not found",
                                command.recipient_id
                            ))
                        })?;
                    Employee::find_by_id(command.author_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Employee {} not found",
                                command.author_id
                            ))
                        })?;
                    let storage = StorageBox::find_by_id(box_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Box {} not found", box_id))
                        })?;

                    let note_number = generate_note_number(txn, &prefix).await?;
                    let note = service_note::ActiveModel {
                        note_number: Set(note_number),
                        created_date: Set(Utc::now().naive_utc()),
                        author_id: Set(command.author_id),
                        recipient_id: Set(command.recipient_id),
                        cartridge_id: Set(command.cartridge_id),
                        quantity: Set(command.quantity),
                        box_id: Set(box_id),
                        reason: Set(command.reason.clone()),
                        comment: Set(command.comment.clone()),
                        status: Set(NoteStatus::Issued),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let remaining = location.quantity - command.quantity;
                    if remaining <= 0 {
                        // Zero-quantity buckets are not a valid persisted state.
                        location.delete(txn).await?;
                    } else {
                        let mut active: cartridge_location::ActiveModel = location.into();
                        active.quantity = Set(remaining);
                        active.update(txn).await?;
                    }

                    let owned = cartridge.total_quantity - command.quantity;
                    let mut cartridge_active: cartridge::ActiveModel = cartridge.into();
                    cartridge_active.total_quantity = Set(owned);
                    cartridge_active.update(txn).await?;

                    let occupied = (storage.current_count - command.quantity).max(0);
                    let from_label = box_label(&storage);
                    let mut box_active: storage_box::ActiveModel = storage.into();
                    box_active.current_count = Set(occupied);
                    box_active.update(txn).await?;

                    let to_label = format!("Employee: {}", recipient.full_name);
                    record_movement(
                        txn,
                        command.cartridge_id,
                        &from_label,
                        &to_label,
                        Some(note.id),
                    )
                    .await?;

                    Ok(note)
                })
            })
            .await?;

        self.event_sender
            .send(Event::NoteIssued {
                note_id: note.id,
                note_number: note.note_number.clone(),
                cartridge_id: note.cartridge_id,
                recipient_id: note.recipient_id,
                quantity: note.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(note)
    }

    /// Returns the cartridges behind an issued note to their source box.
    ///
    /// Only the `issued -> returned` transition exists; a second return of
    /// the same note is rejected so stock is never double-credited. The
    /// cartridge's `total_quantity` is intentionally left untouched: returned
    /// units stay written off the books.
    #[instrument(skip(self))]
    pub async fn return_note(&self, note_id: i32) -> Result<service_note::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let note = db
            .transaction::<_, service_note::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let note = ServiceNote::find_by_id(note_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Service note {} not found", note_id))
                        })?;
                    if note.status != NoteStatus::Issued {
                        return Err(ServiceError::InvalidOperation(format!(
                            "note {} is not in the issued state",
                            note.note_number
                        )));
                    }

                    let existing = CartridgeLocation::find()
                        .filter(cartridge_location::Column::CartridgeId.eq(note.cartridge_id))
                        .filter(cartridge_location::Column::BoxId.eq(note.box_id))
                        .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
                        .one(txn)
                        .await?;
                    match existing {
                        Some(row) => {
                            let merged = row.quantity + note.quantity;
                            let mut active: cartridge_location::ActiveModel = row.into();
                            active.quantity = Set(merged);
                            active.update(txn).await?;
                        }
                        None => {
                            cartridge_location::ActiveModel {
                                cartridge_id: Set(note.cartridge_id),
                                box_id: Set(Some(note.box_id)),
                                employee_id: Set(None),
                                status: Set(LocationStatus::InStock),
                                placed_date: Set(Utc::now().naive_utc()),
                                quantity: Set(note.quantity),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?;
                        }
                    }

                    let mut to_label = String::new();
                    if let Some(storage) = StorageBox::find_by_id(note.box_id).one(txn).await? {
                        to_label = box_label(&storage);
                        let occupied = storage.current_count + note.quantity;
                        let mut box_active: storage_box::ActiveModel = storage.into();
                        box_active.current_count = Set(occupied);
                        box_active.update(txn).await?;
                    }

                    record_movement(txn, note.cartridge_id, IN_USE_LABEL, &to_label, Some(note.id))
                        .await?;

                    let mut note_active: service_note::ActiveModel = note.into();
                    note_active.status = Set(NoteStatus::Returned);
                    let note = note_active.update(txn).await?;

                    Ok(note)
                })
            })
            .await?;

        self.event_sender
            .send(Event::NoteReturned {
                note_id: note.id,
                note_number: note.note_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(note)
    }
}
