use crate::{
    db::DbPool,
    entities::{
        cartridge::{self, Entity as Cartridge},
        cartridge_location::{self, Entity as CartridgeLocation, LocationStatus},
        cartridge_movement::{self, Entity as CartridgeMovement},
        department::{self, Entity as Department},
        employee::{self, Entity as Employee},
        service_note::{self, Entity as ServiceNote},
        storage_box::{self, Entity as StorageBox},
        warehouse::{self, Entity as Warehouse},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub manager: Option<String>,
    pub phone: Option<String>,
    pub employee_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub manager: Option<String>,
    pub phone: Option<String>,
    pub employee_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    pub position: Option<String>,
    pub department_id: Option<i32>,
    pub personnel_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployee {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub department_id: Option<i32>,
    pub personnel_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCartridge {
    #[validate(length(min = 1, max = 50))]
    pub article: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    pub printer_type: Option<String>,
    pub color: Option<String>,
    pub status: Option<String>,
    pub capacity: Option<i32>,
    /// Units on hand at registration; becomes both `initial_quantity` and
    /// the starting `total_quantity`.
    pub initial_quantity: Option<i32>,
    pub production_date: Option<NaiveDate>,
    pub warranty_months: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartridge {
    pub article: Option<String>,
    pub model: Option<String>,
    pub printer_type: Option<String>,
    pub color: Option<String>,
    pub status: Option<String>,
    pub capacity: Option<i32>,
    /// Stock correction; the only replenishment path after registration.
    pub total_quantity: Option<i32>,
    pub production_date: Option<NaiveDate>,
    pub warranty_months: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWarehouse {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWarehouse {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBox {
    pub warehouse_id: i32,
    #[validate(length(min = 1, max = 20))]
    pub box_number: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBox {
    pub box_number: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

/// Reference-data management: departments, employees, cartridges, warehouses
/// and boxes.
///
/// Deletes are guarded by referential checks executed inside the same
/// transaction as the delete, so a concurrent insert of a dependent row
/// cannot slip past the guard.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit_deleted(&self, entity: &str, id: i32) -> Result<(), ServiceError> {
        self.event_sender
            .send(Event::CatalogEntryDeleted {
                entity: entity.to_string(),
                id,
            })
            .await
            .map_err(ServiceError::EventError)
    }

    // Departments

    pub async fn list_departments(&self) -> Result<Vec<department::Model>, ServiceError> {
        Ok(Department::find().all(self.db_pool.as_ref()).await?)
    }

    pub async fn get_department(&self, id: i32) -> Result<Option<department::Model>, ServiceError> {
        Ok(Department::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_department(
        &self,
        input: CreateDepartment,
    ) -> Result<department::Model, ServiceError> {
        input.validate()?;
        let model = department::ActiveModel {
            name: Set(input.name),
            manager: Set(input.manager),
            phone: Set(input.phone),
            employee_count: Set(input.employee_count.unwrap_or(0)),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_department(
        &self,
        id: i32,
        input: UpdateDepartment,
    ) -> Result<department::Model, ServiceError> {
        let existing = self
            .get_department(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Department {} not found", id)))?;
        let mut active: department::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(manager) = input.manager {
            active.manager = Set(Some(manager));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(count) = input.employee_count {
            active.employee_count = Set(count);
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Blocked while the department still has employees.
    #[instrument(skip(self))]
    pub async fn delete_department(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let dept = Department::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Department {} not found", id))
                })?;
                let employees = Employee::find()
                    .filter(employee::Column::DepartmentId.eq(id))
                    .count(txn)
                    .await?;
                if employees > 0 {
                    return Err(ServiceError::ReferentialConflict(format!(
                        "department {} still has {} employee(s)",
                        dept.name, employees
                    )));
                }
                dept.delete(txn).await?;
                Ok(())
            })
        })
        .await?;
        self.emit_deleted("department", id).await
    }

    // Employees

    pub async fn list_employees(&self) -> Result<Vec<employee::Model>, ServiceError> {
        Ok(Employee::find().all(self.db_pool.as_ref()).await?)
    }

    pub async fn get_employee(&self, id: i32) -> Result<Option<employee::Model>, ServiceError> {
        Ok(Employee::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    /// Department name for an employee, for client-side auto-fill. Empty
    /// when the employee has no department.
    pub async fn employee_department_name(&self, id: i32) -> Result<String, ServiceError> {
        let employee = self
            .get_employee(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))?;
        let Some(department_id) = employee.department_id else {
            return Ok(String::new());
        };
        Ok(self
            .get_department(department_id)
            .await?
            .map(|d| d.name)
            .unwrap_or_default())
    }

    #[instrument(skip(self, input))]
    pub async fn create_employee(
        &self,
        input: CreateEmployee,
    ) -> Result<employee::Model, ServiceError> {
        input.validate()?;
        if let Some(department_id) = input.department_id {
            self.get_department(department_id).await?.ok_or_else(|| {
                ServiceError::NotFound(format!("Department {} not found", department_id))
            })?;
        }
        let model = employee::ActiveModel {
            full_name: Set(input.full_name),
            position: Set(input.position),
            department_id: Set(input.department_id),
            personnel_number: Set(input.personnel_number),
            phone: Set(input.phone),
            email: Set(input.email),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_employee(
        &self,
        id: i32,
        input: UpdateEmployee,
    ) -> Result<employee::Model, ServiceError> {
        let existing = self
            .get_employee(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))?;
        let mut active: employee::ActiveModel = existing.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(position) = input.position {
            active.position = Set(Some(position));
        }
        if let Some(department_id) = input.department_id {
            self.get_department(department_id).await?.ok_or_else(|| {
                ServiceError::NotFound(format!("Department {} not found", department_id))
            })?;
            active.department_id = Set(Some(department_id));
        }
        if let Some(personnel_number) = input.personnel_number {
            active.personnel_number = Set(Some(personnel_number));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Blocked while service notes reference the employee as author or
    /// recipient.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let employee = Employee::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Employee {} not found", id))
                })?;
                let notes = ServiceNote::find()
                    .filter(
                        Condition::any()
                            .add(service_note::Column::AuthorId.eq(id))
                            .add(service_note::Column::RecipientId.eq(id)),
                    )
                    .count(txn)
                    .await?;
                if notes > 0 {
                    return Err(ServiceError::ReferentialConflict(format!(
                        "employee {} is referenced by {} service note(s)",
                        employee.full_name, notes
                    )));
                }
                employee.delete(txn).await?;
                Ok(())
            })
        })
        .await?;
        self.emit_deleted("employee", id).await
    }

    // Cartridges

    pub async fn list_cartridges(&self) -> Result<Vec<cartridge::Model>, ServiceError> {
        Ok(Cartridge::find().all(self.db_pool.as_ref()).await?)
    }

    pub async fn get_cartridge(&self, id: i32) -> Result<Option<cartridge::Model>, ServiceError> {
        Ok(Cartridge::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_cartridge(
        &self,
        input: CreateCartridge,
    ) -> Result<cartridge::Model, ServiceError> {
        input.validate()?;
        let initial = input.initial_quantity.unwrap_or(0);
        if initial < 0 {
            return Err(ServiceError::ValidationError(
                "initial quantity cannot be negative".to_string(),
            ));
        }
        let model = cartridge::ActiveModel {
            article: Set(input.article),
            model: Set(input.model),
            printer_type: Set(input.printer_type),
            color: Set(input.color),
            status: Set(input.status.unwrap_or_else(|| "new".to_string())),
            capacity: Set(input.capacity),
            initial_quantity: Set(initial),
            total_quantity: Set(initial),
            production_date: Set(input.production_date),
            warranty_months: Set(input.warranty_months.unwrap_or(12)),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_cartridge(
        &self,
        id: i32,
        input: UpdateCartridge,
    ) -> Result<cartridge::Model, ServiceError> {
        let existing = self
            .get_cartridge(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cartridge {} not found", id)))?;
        let mut active: cartridge::ActiveModel = existing.into();
        if let Some(article) = input.article {
            active.article = Set(article);
        }
        if let Some(model) = input.model {
            active.model = Set(model);
        }
        if let Some(printer_type) = input.printer_type {
            active.printer_type = Set(Some(printer_type));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(capacity) = input.capacity {
            active.capacity = Set(Some(capacity));
        }
        if let Some(total_quantity) = input.total_quantity {
            if total_quantity < 0 {
                return Err(ServiceError::ValidationError(
                    "total quantity cannot be negative".to_string(),
                ));
            }
            active.total_quantity = Set(total_quantity);
        }
        if let Some(production_date) = input.production_date {
            active.production_date = Set(Some(production_date));
        }
        if let Some(warranty_months) = input.warranty_months {
            active.warranty_months = Set(warranty_months);
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Blocked while the cartridge still has units on the books or is
    /// referenced by service notes. Otherwise cascades its location buckets
    /// (fixing box occupancy) and its movement history.
    #[instrument(skip(self))]
    pub async fn delete_cartridge(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let cartridge = Cartridge::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Cartridge {} not found", id))
                })?;
                if cartridge.total_quantity > 0 {
                    return Err(ServiceError::ReferentialConflict(format!(
                        "cartridge {} still has {} unit(s) on the books",
                        cartridge.article, cartridge.total_quantity
                    )));
                }
                let notes = ServiceNote::find()
                    .filter(service_note::Column::CartridgeId.eq(id))
                    .count(txn)
                    .await?;
                if notes > 0 {
                    return Err(ServiceError::ReferentialConflict(format!(
                        "cartridge {} is referenced by {} service note(s)",
                        cartridge.article, notes
                    )));
                }

                // Release box slots held by in-stock buckets before cascading.
                let locations = CartridgeLocation::find()
                    .filter(cartridge_location::Column::CartridgeId.eq(id))
                    .all(txn)
                    .await?;
                for location in &locations {
                    if location.status != LocationStatus::InStock {
                        continue;
                    }
                    let Some(box_id) = location.box_id else {
                        continue;
                    };
                    if let Some(storage) = StorageBox::find_by_id(box_id).one(txn).await? {
                        let occupied = (storage.current_count - location.quantity).max(0);
                        let mut active: storage_box::ActiveModel = storage.into();
                        active.current_count = Set(occupied);
                        active.update(txn).await?;
                    }
                }
                CartridgeLocation::delete_many()
                    .filter(cartridge_location::Column::CartridgeId.eq(id))
                    .exec(txn)
                    .await?;
                CartridgeMovement::delete_many()
                    .filter(cartridge_movement::Column::CartridgeId.eq(id))
                    .exec(txn)
                    .await?;
                cartridge.delete(txn).await?;
                Ok(())
            })
        })
        .await?;
        self.emit_deleted("cartridge", id).await
    }

    // Warehouses

    pub async fn list_warehouses(&self) -> Result<Vec<warehouse::Model>, ServiceError> {
        Ok(Warehouse::find().all(self.db_pool.as_ref()).await?)
    }

    pub async fn get_warehouse(&self, id: i32) -> Result<Option<warehouse::Model>, ServiceError> {
        Ok(Warehouse::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_warehouse(
        &self,
        input: CreateWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;
        let model = warehouse::ActiveModel {
            name: Set(input.name),
            location: Set(input.location),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_warehouse(
        &self,
        id: i32,
        input: UpdateWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        let existing = self
            .get_warehouse(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", id)))?;
        let mut active: warehouse::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Blocked while any box of the warehouse is referenced by service
    /// notes; otherwise cascades boxes and their location buckets.
    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let wh = Warehouse::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Warehouse {} not found", id))
                })?;
                let box_ids: Vec<i32> = StorageBox::find()
                    .filter(storage_box::Column::WarehouseId.eq(id))
                    .all(txn)
                    .await?
                    .into_iter()
                    .map(|b| b.id)
                    .collect();
                if !box_ids.is_empty() {
                    let notes = ServiceNote::find()
                        .filter(service_note::Column::BoxId.is_in(box_ids.clone()))
                        .count(txn)
                        .await?;
                    if notes > 0 {
                        return Err(ServiceError::ReferentialConflict(format!(
                            "warehouse {} is referenced by {} service note(s)",
                            wh.name, notes
                        )));
                    }
                    CartridgeLocation::delete_many()
                        .filter(cartridge_location::Column::BoxId.is_in(box_ids.clone()))
                        .exec(txn)
                        .await?;
                    StorageBox::delete_many()
                        .filter(storage_box::Column::Id.is_in(box_ids))
                        .exec(txn)
                        .await?;
                }
                wh.delete(txn).await?;
                Ok(())
            })
        })
        .await?;
        self.emit_deleted("warehouse", id).await
    }

    // Boxes

    pub async fn list_boxes(&self) -> Result<Vec<storage_box::Model>, ServiceError> {
        Ok(StorageBox::find().all(self.db_pool.as_ref()).await?)
    }

    pub async fn get_box(&self, id: i32) -> Result<Option<storage_box::Model>, ServiceError> {
        Ok(StorageBox::find_by_id(id).one(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_box(&self, input: CreateBox) -> Result<storage_box::Model, ServiceError> {
        input.validate()?;
        self.get_warehouse(input.warehouse_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Warehouse {} not found", input.warehouse_id))
        })?;
        let model = storage_box::ActiveModel {
            warehouse_id: Set(input.warehouse_id),
            box_number: Set(input.box_number),
            description: Set(input.description),
            capacity: Set(input.capacity.unwrap_or(10)),
            current_count: Set(0),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_box(
        &self,
        id: i32,
        input: UpdateBox,
    ) -> Result<storage_box::Model, ServiceError> {
        let existing = self
            .get_box(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Box {} not found", id)))?;
        let mut active: storage_box::ActiveModel = existing.into();
        if let Some(box_number) = input.box_number {
            active.box_number = Set(box_number);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(capacity) = input.capacity {
            if capacity < 1 {
                return Err(ServiceError::ValidationError(
                    "capacity must be positive".to_string(),
                ));
            }
            active.capacity = Set(capacity);
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    /// Blocked while service notes reference the box; otherwise cascades its
    /// location buckets.
    #[instrument(skip(self))]
    pub async fn delete_box(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let storage = StorageBox::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Box {} not found", id))
                })?;
                let notes = ServiceNote::find()
                    .filter(service_note::Column::BoxId.eq(id))
                    .count(txn)
                    .await?;
                if notes > 0 {
                    return Err(ServiceError::ReferentialConflict(format!(
                        "box {} is referenced by {} service note(s)",
                        storage.box_number, notes
                    )));
                }
                CartridgeLocation::delete_many()
                    .filter(cartridge_location::Column::BoxId.eq(id))
                    .exec(txn)
                    .await?;
                storage.delete(txn).await?;
                Ok(())
            })
        })
        .await?;
        self.emit_deleted("box", id).await
    }

    // Locations (read side; mutations go through the ledger)

    pub async fn list_in_stock_locations(
        &self,
    ) -> Result<Vec<cartridge_location::Model>, ServiceError> {
        Ok(CartridgeLocation::find()
            .filter(cartridge_location::Column::Status.eq(LocationStatus::InStock))
            .all(self.db_pool.as_ref())
            .await?)
    }
}
