//! Demo dataset for development environments.
//!
//! Stock is placed through the ledger so box occupancy, location buckets and
//! the movement log come out mutually consistent.

use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::catalog::{
    CreateBox, CreateCartridge, CreateDepartment, CreateEmployee, CreateWarehouse,
};
use chrono::NaiveDate;
use tracing::info;

pub async fn seed_demo_data(services: &AppServices) -> Result<(), ServiceError> {
    if !services.catalog.list_departments().await?.is_empty() {
        info!("Demo data already present; skipping seed");
        return Ok(());
    }

    let accounting = services
        .catalog
        .create_department(CreateDepartment {
            name: "Accounting".to_string(),
            manager: Some("Ivanova A. P.".to_string()),
            phone: Some("+7 (495) 123-45-01".to_string()),
            employee_count: Some(5),
        })
        .await?;
    let it = services
        .catalog
        .create_department(CreateDepartment {
            name: "IT".to_string(),
            manager: Some("Petrov S. V.".to_string()),
            phone: Some("+7 (495) 123-45-02".to_string()),
            employee_count: Some(8),
        })
        .await?;
    let sales = services
        .catalog
        .create_department(CreateDepartment {
            name: "Sales".to_string(),
            manager: Some("Sidorova M. K.".to_string()),
            phone: Some("+7 (495) 123-45-03".to_string()),
            employee_count: Some(12),
        })
        .await?;
    let hr = services
        .catalog
        .create_department(CreateDepartment {
            name: "HR".to_string(),
            manager: Some("Kozlova E. N.".to_string()),
            phone: Some("+7 (495) 123-45-04".to_string()),
            employee_count: Some(3),
        })
        .await?;

    let employees = [
        ("Ivanov Ivan Ivanovich", "Chief Accountant", accounting.id, "001"),
        ("Petrova Maria Sergeevna", "Accountant", accounting.id, "002"),
        ("Sidorov Alexey Vladimirovich", "System Administrator", it.id, "003"),
        ("Kozlova Elena Nikolaevna", "Sales Manager", sales.id, "004"),
        ("Morozov Dmitry Petrovich", "HR Specialist", hr.id, "005"),
    ];
    for (full_name, position, department_id, personnel_number) in employees {
        services
            .catalog
            .create_employee(CreateEmployee {
                full_name: full_name.to_string(),
                position: Some(position.to_string()),
                department_id: Some(department_id),
                personnel_number: Some(personnel_number.to_string()),
                phone: None,
                email: None,
            })
            .await?;
    }

    let cartridges = [
        ("HP-85A-BLK", "HP LaserJet 85A", 2000, 12, (2024, 1, 15)),
        ("HP-83A-BLK", "HP LaserJet 83A", 1500, 5, (2024, 2, 10)),
        ("CN-728-BLK", "Canon 728", 2100, 8, (2024, 3, 5)),
        ("SM-D111S-BLK", "Samsung MLT-D111S", 1000, 3, (2024, 1, 20)),
        ("HP-951XL-C", "HP 951XL Cyan", 1500, 4, (2024, 4, 1)),
    ];
    let mut cartridge_ids = Vec::new();
    for (article, model, capacity, initial, (y, m, d)) in cartridges {
        let cartridge = services
            .catalog
            .create_cartridge(CreateCartridge {
                article: article.to_string(),
                model: model.to_string(),
                printer_type: Some("laser".to_string()),
                color: Some("black".to_string()),
                status: None,
                capacity: Some(capacity),
                initial_quantity: Some(initial),
                production_date: NaiveDate::from_ymd_opt(y, m, d),
                warranty_months: Some(12),
            })
            .await?;
        cartridge_ids.push(cartridge.id);
    }

    let main_wh = services
        .catalog
        .create_warehouse(CreateWarehouse {
            name: "Main warehouse".to_string(),
            location: Some("Office, 1st floor".to_string()),
            description: Some("Primary consumables storage".to_string()),
        })
        .await?;
    let reserve_wh = services
        .catalog
        .create_warehouse(CreateWarehouse {
            name: "Reserve warehouse".to_string(),
            location: Some("Office, basement".to_string()),
            description: Some("Overflow storage".to_string()),
        })
        .await?;

    let boxes = [
        (main_wh.id, "A-01", "HP cartridges", 20),
        (main_wh.id, "A-02", "Canon cartridges", 15),
        (main_wh.id, "B-01", "Samsung cartridges", 10),
        (reserve_wh.id, "R-01", "HP reserve", 10),
    ];
    let mut box_ids = Vec::new();
    for (warehouse_id, box_number, description, capacity) in boxes {
        let storage_box = services
            .catalog
            .create_box(CreateBox {
                warehouse_id,
                box_number: box_number.to_string(),
                description: Some(description.to_string()),
                capacity: Some(capacity),
            })
            .await?;
        box_ids.push(storage_box.id);
    }

    // Initial stock; the leftover HP-85A units stay undistributed.
    let placements = [
        (cartridge_ids[0], box_ids[0], 10),
        (cartridge_ids[1], box_ids[0], 5),
        (cartridge_ids[2], box_ids[1], 8),
        (cartridge_ids[3], box_ids[2], 3),
        (cartridge_ids[4], box_ids[0], 4),
    ];
    for (cartridge_id, box_id, quantity) in placements {
        services.ledger.receive(cartridge_id, box_id, quantity).await?;
    }

    info!("Demo data seeded");
    Ok(())
}
