use cartridge_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig, DbPool},
    events::EventSender,
    services::{
        catalog::{
            CatalogService, CreateBox, CreateCartridge, CreateDepartment, CreateEmployee,
            CreateWarehouse,
        },
        ledger::LedgerService,
        notes::NoteService,
        reports::ReportsService,
    },
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct TestContext {
    pub db: Arc<DbPool>,
    pub catalog: CatalogService,
    pub ledger: LedgerService,
    pub notes: NoteService,
    pub reports: ReportsService,
}

/// Fresh in-memory database with migrations applied and services wired to a
/// drained event channel. A single pooled connection keeps every query on
/// the same SQLite memory instance.
pub async fn setup() -> TestContext {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = Arc::new(
        establish_connection_with_config(&config)
            .await
            .expect("failed to connect to in-memory database"),
    );
    run_migrations(db.as_ref())
        .await
        .expect("failed to run migrations");

    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let event_sender = EventSender::new(tx);

    TestContext {
        catalog: CatalogService::new(db.clone(), event_sender.clone()),
        ledger: LedgerService::new(db.clone(), event_sender.clone()),
        notes: NoteService::new(db.clone(), event_sender, "CART".to_string()),
        reports: ReportsService::new(db.clone(), 3),
        db,
    }
}

pub struct Fixture {
    pub department_id: i32,
    pub author_id: i32,
    pub recipient_id: i32,
    pub cartridge_id: i32,
    pub warehouse_id: i32,
    pub box_id: i32,
}

/// One department, two employees, one cartridge and one box.
pub async fn base_fixture(ctx: &TestContext, initial_quantity: i32, box_capacity: i32) -> Fixture {
    let department = ctx
        .catalog
        .create_department(CreateDepartment {
            name: "IT".to_string(),
            manager: None,
            phone: None,
            employee_count: None,
        })
        .await
        .expect("create department");

    let author = ctx
        .catalog
        .create_employee(CreateEmployee {
            full_name: "Sidorov Alexey Vladimirovich".to_string(),
            position: Some("System Administrator".to_string()),
            department_id: Some(department.id),
            personnel_number: Some("003".to_string()),
            phone: None,
            email: None,
        })
        .await
        .expect("create author");
    let recipient = ctx
        .catalog
        .create_employee(CreateEmployee {
            full_name: "Petrova Maria Sergeevna".to_string(),
            position: Some("Accountant".to_string()),
            department_id: Some(department.id),
            personnel_number: Some("002".to_string()),
            phone: None,
            email: None,
        })
        .await
        .expect("create recipient");

    let cartridge = ctx
        .catalog
        .create_cartridge(CreateCartridge {
            article: "HP-85A-BLK".to_string(),
            model: "HP LaserJet 85A".to_string(),
            printer_type: Some("laser".to_string()),
            color: Some("black".to_string()),
            status: None,
            capacity: Some(2000),
            initial_quantity: Some(initial_quantity),
            production_date: None,
            warranty_months: None,
        })
        .await
        .expect("create cartridge");

    let warehouse = ctx
        .catalog
        .create_warehouse(CreateWarehouse {
            name: "Main warehouse".to_string(),
            location: None,
            description: None,
        })
        .await
        .expect("create warehouse");
    let storage_box = ctx
        .catalog
        .create_box(CreateBox {
            warehouse_id: warehouse.id,
            box_number: "A-01".to_string(),
            description: None,
            capacity: Some(box_capacity),
        })
        .await
        .expect("create box");

    Fixture {
        department_id: department.id,
        author_id: author.id,
        recipient_id: recipient.id,
        cartridge_id: cartridge.id,
        warehouse_id: warehouse.id,
        box_id: storage_box.id,
    }
}
