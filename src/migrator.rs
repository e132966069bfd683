#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_departments_table::Migration),
            Box::new(m20240101_000002_create_employees_table::Migration),
            Box::new(m20240101_000003_create_cartridges_table::Migration),
            Box::new(m20240101_000004_create_warehouses_table::Migration),
            Box::new(m20240101_000005_create_boxes_table::Migration),
            Box::new(m20240101_000006_create_cartridge_locations_table::Migration),
            Box::new(m20240101_000007_create_service_notes_table::Migration),
            Box::new(m20240101_000008_create_cartridge_movements_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_departments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_departments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Departments::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Departments::Manager).string_len(100).null())
                        .col(ColumnDef::new(Departments::Phone).string_len(20).null())
                        .col(
                            ColumnDef::new(Departments::EmployeeCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Departments {
        Table,
        Id,
        Name,
        Manager,
        Phone,
        EmployeeCount,
    }
}

mod m20240101_000002_create_employees_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_employees_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Employees::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Employees::FullName)
                                .string_len(150)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Employees::Position).string_len(100).null())
                        .col(ColumnDef::new(Employees::DepartmentId).integer().null())
                        .col(
                            ColumnDef::new(Employees::PersonnelNumber)
                                .string_len(20)
                                .null(),
                        )
                        .col(ColumnDef::new(Employees::Phone).string_len(20).null())
                        .col(ColumnDef::new(Employees::Email).string_len(100).null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_employees_department_id")
                        .table(Employees::Table)
                        .col(Employees::DepartmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Employees {
        Table,
        Id,
        FullName,
        Position,
        DepartmentId,
        PersonnelNumber,
        Phone,
        Email,
    }
}

mod m20240101_000003_create_cartridges_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_cartridges_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Cartridges::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Cartridges::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Cartridges::Article).string_len(50).not_null())
                        .col(ColumnDef::new(Cartridges::Model).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Cartridges::PrinterType)
                                .string_len(50)
                                .null(),
                        )
                        .col(ColumnDef::new(Cartridges::Color).string_len(30).null())
                        .col(
                            ColumnDef::new(Cartridges::Status)
                                .string_len(30)
                                .not_null()
                                .default("new"),
                        )
                        .col(ColumnDef::new(Cartridges::Capacity).integer().null())
                        .col(
                            ColumnDef::new(Cartridges::InitialQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Cartridges::TotalQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Cartridges::ProductionDate).date().null())
                        .col(
                            ColumnDef::new(Cartridges::WarrantyMonths)
                                .integer()
                                .not_null()
                                .default(12),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cartridges::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Cartridges {
        Table,
        Id,
        Article,
        Model,
        PrinterType,
        Color,
        Status,
        Capacity,
        InitialQuantity,
        TotalQuantity,
        ProductionDate,
        WarrantyMonths,
    }
}

mod m20240101_000004_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Warehouses::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Warehouses::Location).string_len(200).null())
                        .col(ColumnDef::new(Warehouses::Description).text().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Warehouses {
        Table,
        Id,
        Name,
        Location,
        Description,
    }
}

mod m20240101_000005_create_boxes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_boxes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Boxes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Boxes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Boxes::WarehouseId).integer().not_null())
                        .col(ColumnDef::new(Boxes::BoxNumber).string_len(20).not_null())
                        .col(ColumnDef::new(Boxes::Description).string_len(200).null())
                        .col(
                            ColumnDef::new(Boxes::Capacity)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(
                            ColumnDef::new(Boxes::CurrentCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_boxes_warehouse_id")
                        .table(Boxes::Table)
                        .col(Boxes::WarehouseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Boxes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Boxes {
        Table,
        Id,
        WarehouseId,
        BoxNumber,
        Description,
        Capacity,
        CurrentCount,
    }
}

mod m20240101_000006_create_cartridge_locations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_cartridge_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CartridgeLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartridgeLocations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CartridgeLocations::CartridgeId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CartridgeLocations::BoxId).integer().null())
                        .col(
                            ColumnDef::new(CartridgeLocations::EmployeeId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeLocations::Status)
                                .string_len(30)
                                .not_null()
                                .default("in_stock"),
                        )
                        .col(
                            ColumnDef::new(CartridgeLocations::PlacedDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeLocations::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_cartridge_locations_cartridge_id")
                        .table(CartridgeLocations::Table)
                        .col(CartridgeLocations::CartridgeId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_cartridge_locations_box_id")
                        .table(CartridgeLocations::Table)
                        .col(CartridgeLocations::BoxId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CartridgeLocations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CartridgeLocations {
        Table,
        Id,
        CartridgeId,
        BoxId,
        EmployeeId,
        Status,
        PlacedDate,
        Quantity,
    }
}

mod m20240101_000007_create_service_notes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_service_notes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceNotes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceNotes::NoteNumber)
                                .string_len(20)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceNotes::CreatedDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ServiceNotes::AuthorId).integer().not_null())
                        .col(
                            ColumnDef::new(ServiceNotes::RecipientId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceNotes::CartridgeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceNotes::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(ServiceNotes::BoxId).integer().not_null())
                        .col(ColumnDef::new(ServiceNotes::Reason).string_len(50).not_null())
                        .col(ColumnDef::new(ServiceNotes::Comment).text().null())
                        .col(
                            ColumnDef::new(ServiceNotes::Status)
                                .string_len(30)
                                .not_null()
                                .default("requested"),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_service_notes_recipient_id")
                        .table(ServiceNotes::Table)
                        .col(ServiceNotes::RecipientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_service_notes_created_date")
                        .table(ServiceNotes::Table)
                        .col(ServiceNotes::CreatedDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceNotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ServiceNotes {
        Table,
        Id,
        NoteNumber,
        CreatedDate,
        AuthorId,
        RecipientId,
        CartridgeId,
        Quantity,
        BoxId,
        Reason,
        Comment,
        Status,
    }
}

mod m20240101_000008_create_cartridge_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_cartridge_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CartridgeMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartridgeMovements::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CartridgeMovements::CartridgeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeMovements::FromLocation)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeMovements::ToLocation)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeMovements::MovementDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartridgeMovements::ServiceNoteId)
                                .integer()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_cartridge_movements_movement_date")
                        .table(CartridgeMovements::Table)
                        .col(CartridgeMovements::MovementDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CartridgeMovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CartridgeMovements {
        Table,
        Id,
        CartridgeId,
        FromLocation,
        ToLocation,
        MovementDate,
        ServiceNoteId,
    }
}
