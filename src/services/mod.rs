//! Service layer. Each service owns the business rules for one area
//! and talks to the database through the shared pool; handlers stay
//! thin on top of these.

pub mod analytics;
pub mod audit;
pub mod clients;
pub mod equipment;
pub mod inventory;
pub mod invoicing;
pub mod oem;
pub mod pricing;
pub mod products;
pub mod purchasing;
pub mod work_orders;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;

pub use analytics::AnalyticsService;
pub use audit::AuditService;
pub use clients::ClientService;
pub use equipment::EquipmentService;
pub use inventory::InventoryService;
pub use invoicing::InvoicingService;
pub use oem::OemCatalogService;
pub use pricing::PricingService;
pub use products::ProductService;
pub use purchasing::PurchasingService;
pub use work_orders::WorkOrderService;

/// Every service, constructed once at startup and cloned into handlers.
#[derive(Clone)]
pub struct AppServices {
    pub clients: ClientService,
    pub equipment: EquipmentService,
    pub products: ProductService,
    pub inventory: InventoryService,
    pub work_orders: WorkOrderService,
    pub invoicing: InvoicingService,
    pub pricing: PricingService,
    pub purchasing: PurchasingService,
    pub oem: OemCatalogService,
    pub analytics: AnalyticsService,
    pub audit: AuditService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let hundred = Decimal::new(100, 0);
        let default_tax_percent = Decimal::from_f64(config.default_tax_rate)
            .unwrap_or_default()
            * hundred;

        let audit = AuditService::new(db.clone());
        let inventory = InventoryService::new(db.clone(), event_sender.clone(), audit.clone());
        let pricing = PricingService::new(db.clone(), config.default_currency.clone());

        Self {
            clients: ClientService::new(db.clone(), audit.clone()),
            equipment: EquipmentService::new(db.clone(), audit.clone()),
            products: ProductService::new(db.clone(), audit.clone()),
            work_orders: WorkOrderService::new(
                db.clone(),
                event_sender.clone(),
                inventory.clone(),
                pricing.clone(),
                audit.clone(),
            ),
            invoicing: InvoicingService::new(
                db.clone(),
                event_sender.clone(),
                config.default_currency.clone(),
                default_tax_percent,
                audit.clone(),
            ),
            purchasing: PurchasingService::new(
                db.clone(),
                event_sender,
                inventory.clone(),
                config.default_currency.clone(),
                audit.clone(),
            ),
            oem: OemCatalogService::new(db.clone()),
            analytics: AnalyticsService::new(db, audit.clone()),
            inventory,
            pricing,
            audit,
        }
    }
}
