//! HTTP layer. Each module exposes `*_routes()` builders returning
//! `Router<Arc<AppState>>`; wiring happens in `lib.rs`.

pub mod analytics;
pub mod clients;
pub mod common;
pub mod equipment;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod oem;
pub mod pricing;
pub mod products;
pub mod purchasing;
pub mod work_orders;

pub use analytics::{alert_routes, analytics_routes, audit_routes};
pub use clients::{client_routes, technician_routes};
pub use equipment::{equipment_routes, equipment_type_routes};
pub use health::health_routes;
pub use inventory::inventory_routes;
pub use invoices::invoice_routes;
pub use oem::oem_routes;
pub use pricing::pricing_routes;
pub use products::{product_routes, taxonomy_routes, warehouse_routes};
pub use purchasing::{purchase_order_routes, supplier_routes};
pub use work_orders::{flat_rate_routes, work_order_routes};
