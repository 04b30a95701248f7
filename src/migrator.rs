// The `SchemaManager<'_>` form required by `deny(rust_2018_idioms)` is rejected
// with E0195 in these async-trait impls, so allow the elided form here.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_directory_tables::Migration),
            Box::new(m20240101_000002_create_equipment_tables::Migration),
            Box::new(m20240101_000003_create_taxonomy_tables::Migration),
            Box::new(m20240101_000004_create_product_table::Migration),
            Box::new(m20240101_000005_create_warehouse_tables::Migration),
            Box::new(m20240101_000006_create_work_order_tables::Migration),
            Box::new(m20240101_000007_create_invoicing_tables::Migration),
            Box::new(m20240101_000008_create_procurement_tables::Migration),
            Box::new(m20240101_000009_create_pricing_tables::Migration),
            Box::new(m20240101_000010_create_catalog_tables::Migration),
            Box::new(m20240101_000011_create_audit_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_directory_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_directory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::ClientId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Clients::ClientCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Clients::ClientType).string().not_null())
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::ContactName).string().null())
                        .col(ColumnDef::new(Clients::TaxId).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Mobile).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::City).string().null())
                        .col(ColumnDef::new(Clients::State).string().null())
                        .col(ColumnDef::new(Clients::PostalCode).string().null())
                        .col(
                            ColumnDef::new(Clients::CreditLimit)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Clients::CurrentBalance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Clients::PaymentTermsDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Clients::DiscountPercent).decimal_len(5, 2).null())
                        .col(ColumnDef::new(Clients::Status).string().not_null())
                        .col(ColumnDef::new(Clients::Notes).string().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_name")
                        .table(Clients::Table)
                        .col(Clients::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Technicians::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Technicians::TechnicianId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Technicians::EmployeeNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Technicians::FirstName).string().not_null())
                        .col(ColumnDef::new(Technicians::LastName).string().not_null())
                        .col(ColumnDef::new(Technicians::Email).string().null())
                        .col(ColumnDef::new(Technicians::Phone).string().null())
                        .col(ColumnDef::new(Technicians::Specialty).string().null())
                        .col(ColumnDef::new(Technicians::CertificationLevel).string().null())
                        .col(
                            ColumnDef::new(Technicians::HourlyRate)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Technicians::HireDate).date().null())
                        .col(
                            ColumnDef::new(Technicians::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Technicians::Notes).string().null())
                        .col(ColumnDef::new(Technicians::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::UserId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::TechnicianId).integer().null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::LastLoginAt).timestamp().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Technicians::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        ClientId,
        ClientCode,
        ClientType,
        Name,
        ContactName,
        TaxId,
        Email,
        Phone,
        Mobile,
        Address,
        City,
        State,
        PostalCode,
        CreditLimit,
        CurrentBalance,
        PaymentTermsDays,
        DiscountPercent,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Technicians {
        Table,
        TechnicianId,
        EmployeeNumber,
        FirstName,
        LastName,
        Email,
        Phone,
        Specialty,
        CertificationLevel,
        HourlyRate,
        HireDate,
        IsActive,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        UserId,
        Username,
        Email,
        PasswordHash,
        Role,
        TechnicianId,
        IsActive,
        LastLoginAt,
        CreatedAt,
    }
}

mod m20240101_000002_create_equipment_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_equipment_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(EquipmentTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(EquipmentTypes::EquipmentTypeId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(EquipmentTypes::TypeCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(EquipmentTypes::Name).string().not_null())
                        .col(ColumnDef::new(EquipmentTypes::Description).string().null())
                        .col(
                            ColumnDef::new(EquipmentTypes::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(EquipmentTypes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Equipment::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Equipment::EquipmentId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Equipment::EquipmentCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Equipment::EquipmentTypeId).integer().null())
                        .col(ColumnDef::new(Equipment::Brand).string().not_null())
                        .col(ColumnDef::new(Equipment::Model).string().not_null())
                        .col(ColumnDef::new(Equipment::Year).small_integer().null())
                        .col(ColumnDef::new(Equipment::SerialNumber).string().null())
                        .col(ColumnDef::new(Equipment::Vin).string().null())
                        .col(ColumnDef::new(Equipment::LicensePlate).string().null())
                        .col(ColumnDef::new(Equipment::Color).string().null())
                        .col(ColumnDef::new(Equipment::EngineDesc).string().null())
                        .col(ColumnDef::new(Equipment::ClientId).integer().null())
                        .col(ColumnDef::new(Equipment::PurchaseDate).date().null())
                        .col(ColumnDef::new(Equipment::WarrantyUntil).date().null())
                        .col(ColumnDef::new(Equipment::LastServiceDate).date().null())
                        .col(ColumnDef::new(Equipment::NextServiceDate).date().null())
                        .col(
                            ColumnDef::new(Equipment::CurrentMileageHours)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Equipment::TotalServiceCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Equipment::Status).string().not_null())
                        .col(ColumnDef::new(Equipment::Notes).string().null())
                        .col(ColumnDef::new(Equipment::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Equipment::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_equipment_client_id")
                                .from(Equipment::Table, Equipment::ClientId)
                                .to(Clients::Table, Clients::ClientId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_equipment_client_id")
                        .table(Equipment::Table)
                        .col(Equipment::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_equipment_vin")
                        .table(Equipment::Table)
                        .col(Equipment::Vin)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Equipment::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EquipmentTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum EquipmentTypes {
        Table,
        EquipmentTypeId,
        TypeCode,
        Name,
        Description,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Equipment {
        Table,
        EquipmentId,
        EquipmentCode,
        EquipmentTypeId,
        Brand,
        Model,
        Year,
        SerialNumber,
        Vin,
        LicensePlate,
        Color,
        EngineDesc,
        ClientId,
        PurchaseDate,
        WarrantyUntil,
        LastServiceDate,
        NextServiceDate,
        CurrentMileageHours,
        TotalServiceCost,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        ClientId,
    }
}

mod m20240101_000003_create_taxonomy_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_taxonomy_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TaxonomySystems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaxonomySystems::SystemCode)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TaxonomySystems::Name).string().not_null())
                        .col(ColumnDef::new(TaxonomySystems::Description).string().null())
                        .col(
                            ColumnDef::new(TaxonomySystems::DisplayOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(TaxonomySystems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaxonomySubsystems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaxonomySubsystems::SubsystemCode)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TaxonomySubsystems::SystemCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaxonomySubsystems::Name).string().not_null())
                        .col(
                            ColumnDef::new(TaxonomySubsystems::Description)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TaxonomySubsystems::DisplayOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(TaxonomySubsystems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_taxonomy_subsystems_system_code")
                                .from(TaxonomySubsystems::Table, TaxonomySubsystems::SystemCode)
                                .to(TaxonomySystems::Table, TaxonomySystems::SystemCode),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaxonomyGroups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaxonomyGroups::GroupCode)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TaxonomyGroups::SubsystemCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaxonomyGroups::Name).string().not_null())
                        .col(ColumnDef::new(TaxonomyGroups::Description).string().null())
                        .col(
                            ColumnDef::new(TaxonomyGroups::DisplayOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(TaxonomyGroups::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_taxonomy_groups_subsystem_code")
                                .from(TaxonomyGroups::Table, TaxonomyGroups::SubsystemCode)
                                .to(TaxonomySubsystems::Table, TaxonomySubsystems::SubsystemCode),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TaxonomyGroups::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaxonomySubsystems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaxonomySystems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TaxonomySystems {
        Table,
        SystemCode,
        Name,
        Description,
        DisplayOrder,
        IsActive,
    }

    #[derive(DeriveIden)]
    enum TaxonomySubsystems {
        Table,
        SubsystemCode,
        SystemCode,
        Name,
        Description,
        DisplayOrder,
        IsActive,
    }

    #[derive(DeriveIden)]
    enum TaxonomyGroups {
        Table,
        GroupCode,
        SubsystemCode,
        Name,
        Description,
        DisplayOrder,
        IsActive,
    }
}

mod m20240101_000004_create_product_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_product_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductMaster::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductMaster::InternalSku)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ProductMaster::GroupCode).string().not_null())
                        .col(ColumnDef::new(ProductMaster::Name).string().not_null())
                        .col(ColumnDef::new(ProductMaster::Description).string().null())
                        .col(ColumnDef::new(ProductMaster::Brand).string().null())
                        .col(ColumnDef::new(ProductMaster::OemRef).string().null())
                        .col(ColumnDef::new(ProductMaster::OemCode).string().null())
                        .col(ColumnDef::new(ProductMaster::UomCode).string().not_null())
                        .col(ColumnDef::new(ProductMaster::Barcode).string().null())
                        .col(
                            ColumnDef::new(ProductMaster::MinStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::MaxStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::ReorderPoint)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::SafetyStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::LeadTimeDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::StandardCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::AvgCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::LastPurchaseCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::WarrantyDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ProductMaster::IsSerialized)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(ProductMaster::Notes).string().null())
                        .col(
                            ColumnDef::new(ProductMaster::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductMaster::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_master_group_code")
                        .table(ProductMaster::Table)
                        .col(ProductMaster::GroupCode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_master_name")
                        .table(ProductMaster::Table)
                        .col(ProductMaster::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductMaster::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductMaster {
        Table,
        InternalSku,
        GroupCode,
        Name,
        Description,
        Brand,
        OemRef,
        OemCode,
        UomCode,
        Barcode,
        MinStock,
        MaxStock,
        ReorderPoint,
        SafetyStock,
        LeadTimeDays,
        StandardCost,
        AvgCost,
        LastPurchaseCost,
        WarrantyDays,
        IsActive,
        IsSerialized,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_warehouse_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_warehouse_tables"
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
                            ColumnDef::new(Warehouses::WarehouseCode)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::WarehouseType).string().null())
                        .col(ColumnDef::new(Warehouses::Address).string().null())
                        .col(ColumnDef::new(Warehouses::ContactPhone).string().null())
                        .col(ColumnDef::new(Warehouses::Manager).string().null())
                        .col(
                            ColumnDef::new(Warehouses::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Warehouses::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Bins::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bins::BinId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Bins::WarehouseCode).string().not_null())
                        .col(ColumnDef::new(Bins::BinCode).string().not_null())
                        .col(ColumnDef::new(Bins::Description).string().null())
                        .col(ColumnDef::new(Bins::Zone).string().null())
                        .col(ColumnDef::new(Bins::Aisle).string().null())
                        .col(ColumnDef::new(Bins::Rack).string().null())
                        .col(ColumnDef::new(Bins::Level).string().null())
                        .col(ColumnDef::new(Bins::Capacity).integer().null())
                        .col(
                            ColumnDef::new(Bins::CurrentOccupancy)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bins::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Bins::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bins_warehouse_code")
                                .from(Bins::Table, Bins::WarehouseCode)
                                .to(Warehouses::Table, Warehouses::WarehouseCode),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bins_warehouse_bin")
                        .table(Bins::Table)
                        .col(Bins::WarehouseCode)
                        .col(Bins::BinCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Stock::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stock::StockId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Stock::WarehouseCode).string().not_null())
                        .col(ColumnDef::new(Stock::InternalSku).string().not_null())
                        .col(ColumnDef::new(Stock::BinId).integer().null())
                        .col(
                            ColumnDef::new(Stock::QtyOnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Stock::QtyReserved)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Stock::QtyAvailable)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Stock::QtyOnOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Stock::UnitCost)
                                .decimal_len(12, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Stock::LastReceiptDate).date().null())
                        .col(ColumnDef::new(Stock::LastCountDate).date().null())
                        .col(ColumnDef::new(Stock::Status).string().not_null())
                        .col(ColumnDef::new(Stock::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Stock::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_warehouse_code")
                                .from(Stock::Table, Stock::WarehouseCode)
                                .to(Warehouses::Table, Warehouses::WarehouseCode),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_internal_sku")
                                .from(Stock::Table, Stock::InternalSku)
                                .to(ProductMaster::Table, ProductMaster::InternalSku),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_warehouse_sku")
                        .table(Stock::Table)
                        .col(Stock::WarehouseCode)
                        .col(Stock::InternalSku)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::TransactionId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::WarehouseCode).string().not_null())
                        .col(ColumnDef::new(Transactions::InternalSku).string().not_null())
                        .col(ColumnDef::new(Transactions::Quantity).integer().not_null())
                        .col(ColumnDef::new(Transactions::UnitCost).decimal_len(12, 4).null())
                        .col(ColumnDef::new(Transactions::TotalCost).decimal_len(15, 2).null())
                        .col(ColumnDef::new(Transactions::ReferenceType).string().null())
                        .col(ColumnDef::new(Transactions::ReferenceId).integer().null())
                        .col(ColumnDef::new(Transactions::ReferenceNumber).string().null())
                        .col(ColumnDef::new(Transactions::Notes).string().null())
                        .col(ColumnDef::new(Transactions::CreatedBy).integer().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_sku_date")
                        .table(Transactions::Table)
                        .col(Transactions::InternalSku)
                        .col(Transactions::TransactionDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_reference")
                        .table(Transactions::Table)
                        .col(Transactions::ReferenceType)
                        .col(Transactions::ReferenceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stock::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Bins::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Warehouses {
        Table,
        WarehouseCode,
        Name,
        WarehouseType,
        Address,
        ContactPhone,
        Manager,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Bins {
        Table,
        BinId,
        WarehouseCode,
        BinCode,
        Description,
        Zone,
        Aisle,
        Rack,
        Level,
        Capacity,
        CurrentOccupancy,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Stock {
        Table,
        StockId,
        WarehouseCode,
        InternalSku,
        BinId,
        QtyOnHand,
        QtyReserved,
        QtyAvailable,
        QtyOnOrder,
        UnitCost,
        LastReceiptDate,
        LastCountDate,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        TransactionId,
        TransactionDate,
        TransactionType,
        WarehouseCode,
        InternalSku,
        Quantity,
        UnitCost,
        TotalCost,
        ReferenceType,
        ReferenceId,
        ReferenceNumber,
        Notes,
        CreatedBy,
    }

    #[derive(DeriveIden)]
    enum ProductMaster {
        Table,
        InternalSku,
    }
}

mod m20240101_000006_create_work_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_work_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkOrders::WoId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::WoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(WorkOrders::EquipmentId).integer().not_null())
                        .col(ColumnDef::new(WorkOrders::ClientId).integer().not_null())
                        .col(ColumnDef::new(WorkOrders::AppointmentDate).timestamp().null())
                        .col(ColumnDef::new(WorkOrders::ReceptionDate).timestamp().null())
                        .col(
                            ColumnDef::new(WorkOrders::EstimatedStartDate)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkOrders::ActualStartDate).timestamp().null())
                        .col(
                            ColumnDef::new(WorkOrders::EstimatedCompletionDate)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::ActualCompletionDate)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkOrders::DeliveryDate).timestamp().null())
                        .col(ColumnDef::new(WorkOrders::ServiceType).string().not_null())
                        .col(ColumnDef::new(WorkOrders::CustomerComplaints).string().null())
                        .col(ColumnDef::new(WorkOrders::InitialFindings).string().null())
                        .col(ColumnDef::new(WorkOrders::TechnicianNotes).string().null())
                        .col(ColumnDef::new(WorkOrders::FinalReport).string().null())
                        .col(
                            ColumnDef::new(WorkOrders::EstimatedHours)
                                .decimal_len(8, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::ActualHours)
                                .decimal_len(8, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::LaborRate)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::LaborCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::PartsCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::TotalCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::DiscountAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(WorkOrders::Status).string().not_null())
                        .col(ColumnDef::new(WorkOrders::Priority).string().not_null())
                        .col(ColumnDef::new(WorkOrders::AdvisorId).integer().null())
                        .col(ColumnDef::new(WorkOrders::TechnicianId).integer().null())
                        .col(ColumnDef::new(WorkOrders::MileageIn).integer().null())
                        .col(ColumnDef::new(WorkOrders::MileageOut).integer().null())
                        .col(ColumnDef::new(WorkOrders::CreatedBy).integer().null())
                        .col(ColumnDef::new(WorkOrders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(WorkOrders::UpdatedAt).timestamp().null())
                        .col(ColumnDef::new(WorkOrders::ClosedAt).timestamp().null())
                        .col(ColumnDef::new(WorkOrders::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_work_orders_client_id")
                                .from(WorkOrders::Table, WorkOrders::ClientId)
                                .to(Clients::Table, Clients::ClientId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_work_orders_equipment_id")
                                .from(WorkOrders::Table, WorkOrders::EquipmentId)
                                .to(Equipment::Table, Equipment::EquipmentId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_work_orders_status")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_work_orders_client_id")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WoItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WoItems::ItemId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(WoItems::WoId).integer().not_null())
                        .col(ColumnDef::new(WoItems::InternalSku).string().not_null())
                        .col(ColumnDef::new(WoItems::QtyOrdered).integer().not_null())
                        .col(
                            ColumnDef::new(WoItems::QtyUsed)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoItems::QtyReturned)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoItems::UnitPrice)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoItems::DiscountPercent)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoItems::TaxPercent)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(WoItems::ReservedStockId).big_integer().null())
                        .col(ColumnDef::new(WoItems::ReservedStockDate).date().null())
                        .col(ColumnDef::new(WoItems::UsedStockId).big_integer().null())
                        .col(ColumnDef::new(WoItems::UsedStockDate).date().null())
                        .col(ColumnDef::new(WoItems::Status).string().not_null())
                        .col(ColumnDef::new(WoItems::Notes).string().null())
                        .col(ColumnDef::new(WoItems::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_wo_items_wo_id")
                                .from(WoItems::Table, WoItems::WoId)
                                .to(WorkOrders::Table, WorkOrders::WoId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_wo_items_wo_id")
                        .table(WoItems::Table)
                        .col(WoItems::WoId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(FlatRateStandards::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FlatRateStandards::StandardId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::ServiceCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::EquipmentTypeId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(FlatRateStandards::GroupCode).string().null())
                        .col(
                            ColumnDef::new(FlatRateStandards::StandardHours)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::MinHours)
                                .decimal_len(5, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::MaxHours)
                                .decimal_len(5, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::DifficultyLevel)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(FlatRateStandards::ValidFrom).date().not_null())
                        .col(ColumnDef::new(FlatRateStandards::ValidUntil).date().null())
                        .col(
                            ColumnDef::new(FlatRateStandards::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(FlatRateStandards::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WoServices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WoServices::ServiceId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(WoServices::WoId).integer().not_null())
                        .col(ColumnDef::new(WoServices::FlatRateId).integer().null())
                        .col(ColumnDef::new(WoServices::ServiceCode).string().null())
                        .col(ColumnDef::new(WoServices::Description).string().not_null())
                        .col(
                            ColumnDef::new(WoServices::FlatHours)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoServices::EstimatedHours)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoServices::ActualHours)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoServices::HourlyRate)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WoServices::CompletionStatus)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WoServices::TechnicianId).integer().null())
                        .col(ColumnDef::new(WoServices::StartedAt).timestamp().null())
                        .col(ColumnDef::new(WoServices::CompletedAt).timestamp().null())
                        .col(ColumnDef::new(WoServices::Notes).string().null())
                        .col(ColumnDef::new(WoServices::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_wo_services_wo_id")
                                .from(WoServices::Table, WoServices::WoId)
                                .to(WorkOrders::Table, WorkOrders::WoId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_wo_services_wo_id")
                        .table(WoServices::Table)
                        .col(WoServices::WoId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_flat_rate_service_code")
                        .table(FlatRateStandards::Table)
                        .col(FlatRateStandards::ServiceCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WoServices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FlatRateStandards::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WoItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum WorkOrders {
        Table,
        WoId,
        WoNumber,
        EquipmentId,
        ClientId,
        AppointmentDate,
        ReceptionDate,
        EstimatedStartDate,
        ActualStartDate,
        EstimatedCompletionDate,
        ActualCompletionDate,
        DeliveryDate,
        ServiceType,
        CustomerComplaints,
        InitialFindings,
        TechnicianNotes,
        FinalReport,
        EstimatedHours,
        ActualHours,
        LaborRate,
        LaborCost,
        PartsCost,
        TotalCost,
        DiscountAmount,
        Status,
        Priority,
        AdvisorId,
        TechnicianId,
        MileageIn,
        MileageOut,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
        ClosedAt,
        Notes,
    }

    #[derive(DeriveIden)]
    enum WoItems {
        Table,
        ItemId,
        WoId,
        InternalSku,
        QtyOrdered,
        QtyUsed,
        QtyReturned,
        UnitPrice,
        DiscountPercent,
        TaxPercent,
        ReservedStockId,
        ReservedStockDate,
        UsedStockId,
        UsedStockDate,
        Status,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum WoServices {
        Table,
        ServiceId,
        WoId,
        FlatRateId,
        ServiceCode,
        Description,
        FlatHours,
        EstimatedHours,
        ActualHours,
        HourlyRate,
        CompletionStatus,
        TechnicianId,
        StartedAt,
        CompletedAt,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum FlatRateStandards {
        Table,
        StandardId,
        ServiceCode,
        Description,
        EquipmentTypeId,
        GroupCode,
        StandardHours,
        MinHours,
        MaxHours,
        DifficultyLevel,
        ValidFrom,
        ValidUntil,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        ClientId,
    }

    #[derive(DeriveIden)]
    enum Equipment {
        Table,
        EquipmentId,
    }
}

mod m20240101_000007_create_invoicing_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_invoicing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::InvoiceId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::WoId).integer().null())
                        .col(ColumnDef::new(Invoices::ClientId).integer().not_null())
                        .col(ColumnDef::new(Invoices::CurrencyCode).string().null())
                        .col(
                            ColumnDef::new(Invoices::Subtotal)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TaxAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::DiscountAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::Status).string().not_null())
                        .col(ColumnDef::new(Invoices::IssueDate).date().null())
                        .col(ColumnDef::new(Invoices::DueDate).date().null())
                        .col(ColumnDef::new(Invoices::PaidDate).date().null())
                        .col(ColumnDef::new(Invoices::Notes).string().null())
                        .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Invoices::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_client_id")
                                .from(Invoices::Table, Invoices::ClientId)
                                .to(Clients::Table, Clients::ClientId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_wo_id")
                                .from(Invoices::Table, Invoices::WoId)
                                .to(WorkOrders::Table, WorkOrders::WoId),
                        )
                        .to_owned(),
                )
                .await?;

            // One invoice per work order, enforced at the schema level.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_wo_id")
                        .table(Invoices::Table)
                        .col(Invoices::WoId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InvoiceItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceItems::InvoiceItemId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(InvoiceItems::InvoiceId).integer().not_null())
                        .col(ColumnDef::new(InvoiceItems::InternalSku).string().null())
                        .col(ColumnDef::new(InvoiceItems::Description).string().not_null())
                        .col(ColumnDef::new(InvoiceItems::Qty).integer().not_null())
                        .col(
                            ColumnDef::new(InvoiceItems::UnitPrice)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::TaxPercent)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::DiscountPercent)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_items_invoice_id")
                                .from(InvoiceItems::Table, InvoiceItems::InvoiceId)
                                .to(Invoices::Table, Invoices::InvoiceId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::PaymentId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Payments::InvoiceId).integer().not_null())
                        .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                        .col(
                            ColumnDef::new(Payments::Amount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::CurrencyCode).string().null())
                        .col(ColumnDef::new(Payments::PaymentMethod).string().not_null())
                        .col(ColumnDef::new(Payments::ReferenceNumber).string().null())
                        .col(ColumnDef::new(Payments::Notes).string().null())
                        .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_invoice_id")
                                .from(Payments::Table, Payments::InvoiceId)
                                .to(Invoices::Table, Invoices::InvoiceId),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InvoiceItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        InvoiceId,
        InvoiceNumber,
        WoId,
        ClientId,
        CurrencyCode,
        Subtotal,
        TaxAmount,
        DiscountAmount,
        TotalAmount,
        Status,
        IssueDate,
        DueDate,
        PaidDate,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InvoiceItems {
        Table,
        InvoiceItemId,
        InvoiceId,
        InternalSku,
        Description,
        Qty,
        UnitPrice,
        TaxPercent,
        DiscountPercent,
    }

    #[derive(DeriveIden)]
    enum Payments {
        Table,
        PaymentId,
        InvoiceId,
        PaymentDate,
        Amount,
        CurrencyCode,
        PaymentMethod,
        ReferenceNumber,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        ClientId,
    }

    #[derive(DeriveIden)]
    enum WorkOrders {
        Table,
        WoId,
    }
}

mod m20240101_000008_create_procurement_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_procurement_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::SupplierId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::SupplierCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::TaxId).string().null())
                        .col(ColumnDef::new(Suppliers::ContactName).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::City).string().null())
                        .col(ColumnDef::new(Suppliers::Country).string().null())
                        .col(ColumnDef::new(Suppliers::PaymentTermsDays).integer().null())
                        .col(ColumnDef::new(Suppliers::Rating).decimal_len(5, 2).null())
                        .col(ColumnDef::new(Suppliers::LeadTimeDays).integer().null())
                        .col(
                            ColumnDef::new(Suppliers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierSkus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierSkus::SupplierSkuId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SupplierSkus::SupplierId).integer().not_null())
                        .col(ColumnDef::new(SupplierSkus::InternalSku).string().not_null())
                        .col(
                            ColumnDef::new(SupplierSkus::SupplierPartNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierSkus::UnitCost).decimal_len(12, 4).null())
                        .col(ColumnDef::new(SupplierSkus::CurrencyCode).string().null())
                        .col(ColumnDef::new(SupplierSkus::MinOrderQty).integer().null())
                        .col(ColumnDef::new(SupplierSkus::LeadTimeDays).integer().null())
                        .col(
                            ColumnDef::new(SupplierSkus::IsPreferred)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(SupplierSkus::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(SupplierSkus::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_skus_supplier_id")
                                .from(SupplierSkus::Table, SupplierSkus::SupplierId)
                                .to(Suppliers::Table, Suppliers::SupplierId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supplier_skus_supplier_sku")
                        .table(SupplierSkus::Table)
                        .col(SupplierSkus::SupplierId)
                        .col(SupplierSkus::InternalSku)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::PoId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::WarehouseCode).string().null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                        .col(ColumnDef::new(PurchaseOrders::ExpectedDate).date().null())
                        .col(ColumnDef::new(PurchaseOrders::ReceivedDate).date().null())
                        .col(ColumnDef::new(PurchaseOrders::CurrencyCode).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Subtotal)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TaxAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(ColumnDef::new(PurchaseOrders::CreatedBy).integer().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_supplier_id")
                                .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                                .to(Suppliers::Table, Suppliers::SupplierId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PoItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PoItems::PoItemId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PoItems::PoId).integer().not_null())
                        .col(ColumnDef::new(PoItems::InternalSku).string().not_null())
                        .col(ColumnDef::new(PoItems::QtyOrdered).integer().not_null())
                        .col(
                            ColumnDef::new(PoItems::QtyReceived)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PoItems::UnitCost)
                                .decimal_len(12, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PoItems::TaxPercent)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PoItems::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_po_items_po_id")
                                .from(PoItems::Table, PoItems::PoId)
                                .to(PurchaseOrders::Table, PurchaseOrders::PoId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PoItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SupplierSkus::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        SupplierId,
        SupplierCode,
        Name,
        TaxId,
        ContactName,
        Email,
        Phone,
        Address,
        City,
        Country,
        PaymentTermsDays,
        Rating,
        LeadTimeDays,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SupplierSkus {
        Table,
        SupplierSkuId,
        SupplierId,
        InternalSku,
        SupplierPartNumber,
        UnitCost,
        CurrencyCode,
        MinOrderQty,
        LeadTimeDays,
        IsPreferred,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        PoId,
        PoNumber,
        SupplierId,
        WarehouseCode,
        Status,
        OrderDate,
        ExpectedDate,
        ReceivedDate,
        CurrencyCode,
        Subtotal,
        TaxAmount,
        TotalAmount,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PoItems {
        Table,
        PoItemId,
        PoId,
        InternalSku,
        QtyOrdered,
        QtyReceived,
        UnitCost,
        TaxPercent,
        Notes,
    }
}

mod m20240101_000009_create_pricing_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_pricing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PriceLists::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriceLists::PriceListId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PriceLists::ListCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PriceLists::Name).string().not_null())
                        .col(ColumnDef::new(PriceLists::CurrencyCode).string().not_null())
                        .col(
                            ColumnDef::new(PriceLists::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PriceLists::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(PriceLists::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductPrices::PriceId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::PriceListId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::InternalSku)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::UnitPrice)
                                .decimal_len(12, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::MinQty)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(ProductPrices::ValidFrom).date().not_null())
                        .col(ColumnDef::new(ProductPrices::ValidUntil).date().null())
                        .col(
                            ColumnDef::new(ProductPrices::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_prices_price_list_id")
                                .from(ProductPrices::Table, ProductPrices::PriceListId)
                                .to(PriceLists::Table, PriceLists::PriceListId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_prices_lookup")
                        .table(ProductPrices::Table)
                        .col(ProductPrices::PriceListId)
                        .col(ProductPrices::InternalSku)
                        .col(ProductPrices::ValidFrom)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductPrices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PriceLists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PriceLists {
        Table,
        PriceListId,
        ListCode,
        Name,
        CurrencyCode,
        IsDefault,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductPrices {
        Table,
        PriceId,
        PriceListId,
        InternalSku,
        UnitPrice,
        MinQty,
        ValidFrom,
        ValidUntil,
        CreatedAt,
    }
}

mod m20240101_000010_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OemBrands::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OemBrands::BrandCode)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OemBrands::Name).string().not_null())
                        .col(ColumnDef::new(OemBrands::Country).string().null())
                        .col(ColumnDef::new(OemBrands::Website).string().null())
                        .col(
                            ColumnDef::new(OemBrands::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(OemBrands::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OemCatalog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OemCatalog::CatalogItemId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OemCatalog::BrandCode).string().not_null())
                        .col(ColumnDef::new(OemCatalog::OemPartNumber).string().not_null())
                        .col(ColumnDef::new(OemCatalog::Description).string().not_null())
                        .col(ColumnDef::new(OemCatalog::GroupCode).string().null())
                        .col(ColumnDef::new(OemCatalog::InternalSku).string().null())
                        .col(ColumnDef::new(OemCatalog::ListPrice).decimal_len(12, 2).null())
                        .col(ColumnDef::new(OemCatalog::CurrencyCode).string().null())
                        .col(ColumnDef::new(OemCatalog::SupersededBy).string().null())
                        .col(
                            ColumnDef::new(OemCatalog::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(OemCatalog::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(OemCatalog::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_oem_catalog_brand_code")
                                .from(OemCatalog::Table, OemCatalog::BrandCode)
                                .to(OemBrands::Table, OemBrands::BrandCode),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_oem_catalog_brand_part")
                        .table(OemCatalog::Table)
                        .col(OemCatalog::BrandCode)
                        .col(OemCatalog::OemPartNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_oem_catalog_part_number")
                        .table(OemCatalog::Table)
                        .col(OemCatalog::OemPartNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OemEquivalences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OemEquivalences::EquivalenceId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OemEquivalences::CatalogItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OemEquivalences::EquivalentItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OemEquivalences::EquivalenceType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OemEquivalences::Confidence).integer().null())
                        .col(ColumnDef::new(OemEquivalences::Notes).string().null())
                        .col(
                            ColumnDef::new(OemEquivalences::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_oem_equivalences_item")
                                .from(OemEquivalences::Table, OemEquivalences::CatalogItemId)
                                .to(OemCatalog::Table, OemCatalog::CatalogItemId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_oem_equivalences_equivalent")
                                .from(OemEquivalences::Table, OemEquivalences::EquivalentItemId)
                                .to(OemCatalog::Table, OemCatalog::CatalogItemId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_oem_equivalences_pair")
                        .table(OemEquivalences::Table)
                        .col(OemEquivalences::CatalogItemId)
                        .col(OemEquivalences::EquivalentItemId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Fitments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Fitments::FitmentId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Fitments::CatalogItemId).big_integer().not_null())
                        .col(ColumnDef::new(Fitments::EquipmentTypeId).integer().null())
                        .col(ColumnDef::new(Fitments::EquipmentId).integer().null())
                        .col(ColumnDef::new(Fitments::YearFrom).integer().null())
                        .col(ColumnDef::new(Fitments::YearTo).integer().null())
                        .col(ColumnDef::new(Fitments::EngineCode).string().null())
                        .col(ColumnDef::new(Fitments::Notes).string().null())
                        .col(
                            ColumnDef::new(Fitments::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Fitments::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_fitments_catalog_item_id")
                                .from(Fitments::Table, Fitments::CatalogItemId)
                                .to(OemCatalog::Table, OemCatalog::CatalogItemId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_fitments_catalog_item_id")
                        .table(Fitments::Table)
                        .col(Fitments::CatalogItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Fitments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OemEquivalences::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OemCatalog::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OemBrands::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OemBrands {
        Table,
        BrandCode,
        Name,
        Country,
        Website,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum OemCatalog {
        Table,
        CatalogItemId,
        BrandCode,
        OemPartNumber,
        Description,
        GroupCode,
        InternalSku,
        ListPrice,
        CurrencyCode,
        SupersededBy,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum OemEquivalences {
        Table,
        EquivalenceId,
        CatalogItemId,
        EquivalentItemId,
        EquivalenceType,
        Confidence,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Fitments {
        Table,
        FitmentId,
        CatalogItemId,
        EquipmentTypeId,
        EquipmentId,
        YearFrom,
        YearTo,
        EngineCode,
        Notes,
        IsVerified,
        CreatedAt,
    }
}

mod m20240101_000011_create_audit_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000011_create_audit_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AuditLog::AuditId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AuditLog::TableName).string().not_null())
                        .col(ColumnDef::new(AuditLog::RecordId).string().not_null())
                        .col(ColumnDef::new(AuditLog::Action).string().not_null())
                        .col(ColumnDef::new(AuditLog::OldValues).json().null())
                        .col(ColumnDef::new(AuditLog::NewValues).json().null())
                        .col(ColumnDef::new(AuditLog::UserId).integer().null())
                        .col(ColumnDef::new(AuditLog::Username).string().null())
                        .col(ColumnDef::new(AuditLog::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_audit_log_table_record")
                        .table(AuditLog::Table)
                        .col(AuditLog::TableName)
                        .col(AuditLog::RecordId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Alerts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Alerts::AlertId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Alerts::AlertType).string().not_null())
                        .col(ColumnDef::new(Alerts::Severity).string().not_null())
                        .col(ColumnDef::new(Alerts::Message).string().not_null())
                        .col(ColumnDef::new(Alerts::ReferenceType).string().null())
                        .col(ColumnDef::new(Alerts::ReferenceId).string().null())
                        .col(
                            ColumnDef::new(Alerts::IsResolved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Alerts::ResolvedAt).timestamp().null())
                        .col(ColumnDef::new(Alerts::ResolvedBy).integer().null())
                        .col(ColumnDef::new(Alerts::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_alerts_unresolved")
                        .table(Alerts::Table)
                        .col(Alerts::IsResolved)
                        .col(Alerts::AlertType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Alerts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AuditLog {
        Table,
        AuditId,
        TableName,
        RecordId,
        Action,
        OldValues,
        NewValues,
        UserId,
        Username,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Alerts {
        Table,
        AlertId,
        AlertType,
        Severity,
        Message,
        ReferenceType,
        ReferenceId,
        IsResolved,
        ResolvedAt,
        ResolvedBy,
        CreatedAt,
    }
}
