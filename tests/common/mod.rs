use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;

use forge_api::config::AppConfig;
use forge_api::db::{self, DbConfig, DbPool};
use forge_api::entities::{client, equipment, taxonomy_group, taxonomy_subsystem, taxonomy_system};
use forge_api::events::EventSender;
use forge_api::services::clients::CreateClientInput;
use forge_api::services::equipment::CreateEquipmentInput;
use forge_api::services::products::{CreateProductInput, CreateWarehouseInput};
use forge_api::services::AppServices;

/// Service layer wired against a fresh in-memory SQLite database.
pub struct TestCtx {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    pub event_sender: EventSender,
    _event_task: tokio::task::JoinHandle<()>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "k9HqT3vWzR8mN2bX5cY7dF1gJ4pL6sA0eU9iO3wQ5rT7yV2xZ4nB6mC8vK1hG3jQ".into(),
        jwt_expiration: 3600,
        refresh_token_expiration: 86_400,
        host: "127.0.0.1".into(),
        port: 18_080,
        environment: "test".into(),
        log_level: "debug".into(),
        log_json: false,
        auto_migrate: true,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 5,
        api_default_page_size: 20,
        api_max_page_size: 100,
        default_currency: "USD".into(),
        default_tax_rate: 0.16,
        event_channel_capacity: 64,
        auth_issuer: "forge-api".into(),
        auth_audience: "forge-auth".into(),
    }
}

impl TestCtx {
    pub async fn new() -> Self {
        let cfg = test_config();
        // A single pooled connection keeps the in-memory database alive
        // for the whole test.
        let db_cfg = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("test database");
        db::run_migrations(&pool).await.expect("migrations");
        let db = Arc::new(pool);

        let (tx, rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(tx);
        let event_task = tokio::spawn(forge_api::events::process_events(rx));

        let services = AppServices::new(db.clone(), event_sender.clone(), &cfg);
        Self {
            db,
            services,
            event_sender,
            _event_task: event_task,
        }
    }

    /// One system/subsystem/group chain so products can be classified.
    pub async fn seed_taxonomy(&self) {
        taxonomy_system::ActiveModel {
            system_code: Set("MEC".into()),
            name: Set("Mechanical".into()),
            description: Set(None),
            display_order: Set(1),
            is_active: Set(true),
        }
        .insert(&*self.db)
        .await
        .expect("taxonomy system");
        taxonomy_subsystem::ActiveModel {
            subsystem_code: Set("ENG".into()),
            system_code: Set("MEC".into()),
            name: Set("Engine".into()),
            description: Set(None),
            display_order: Set(1),
            is_active: Set(true),
        }
        .insert(&*self.db)
        .await
        .expect("taxonomy subsystem");
        taxonomy_group::ActiveModel {
            group_code: Set("FIL".into()),
            subsystem_code: Set("ENG".into()),
            name: Set("Filters".into()),
            description: Set(None),
            display_order: Set(1),
            is_active: Set(true),
        }
        .insert(&*self.db)
        .await
        .expect("taxonomy group");
    }

    pub async fn seed_warehouse(&self, code: &str) {
        self.services
            .products
            .create_warehouse(CreateWarehouseInput {
                warehouse_code: code.into(),
                name: format!("Warehouse {code}"),
                warehouse_type: None,
                address: None,
                contact_phone: None,
                manager: None,
            })
            .await
            .expect("warehouse");
    }

    pub async fn seed_product(&self, sku: &str) {
        self.services
            .products
            .create_product(CreateProductInput {
                internal_sku: sku.into(),
                group_code: "FIL".into(),
                name: format!("Part {sku}"),
                description: None,
                brand: None,
                oem_ref: None,
                oem_code: None,
                uom_code: "EA".into(),
                barcode: None,
                min_stock: Some(2),
                max_stock: Some(50),
                reorder_point: Some(5),
                safety_stock: Some(2),
                lead_time_days: Some(7),
                standard_cost: Some(Decimal::new(1000, 2)),
                warranty_days: None,
                is_serialized: false,
                notes: None,
            })
            .await
            .expect("product");
    }

    pub async fn seed_stock(&self, warehouse: &str, sku: &str, qty: i32, unit_cost: Decimal) {
        self.services
            .inventory
            .receive_stock(warehouse, sku, qty, unit_cost, None, None, None, None)
            .await
            .expect("stock receipt");
    }

    pub async fn seed_client(&self, code: &str) -> client::Model {
        self.services
            .clients
            .create_client(
                CreateClientInput {
                    client_code: code.into(),
                    client_type: "INDIVIDUAL".into(),
                    name: format!("Client {code}"),
                    contact_name: None,
                    tax_id: None,
                    email: None,
                    phone: None,
                    mobile: None,
                    address: None,
                    city: None,
                    state: None,
                    postal_code: None,
                    credit_limit: None,
                    payment_terms_days: None,
                    discount_percent: None,
                    notes: None,
                },
                None,
            )
            .await
            .expect("client")
    }

    pub async fn seed_equipment(&self, client_id: i32, code: &str) -> equipment::Model {
        self.services
            .equipment
            .create_equipment(CreateEquipmentInput {
                equipment_code: code.into(),
                equipment_type_id: None,
                brand: "Toyota".into(),
                model: "Hilux".into(),
                year: Some(2020),
                serial_number: None,
                vin: None,
                license_plate: None,
                color: None,
                engine_desc: None,
                client_id: Some(client_id),
                purchase_date: None,
                warranty_until: None,
                current_mileage_hours: Some(42_000),
                notes: None,
            })
            .await
            .expect("equipment")
    }
}
