//! SeaORM entities for the workshop schema.
//!
//! Table and column names mirror the production PostgreSQL schema:
//! parties (clients, technicians, users), equipment and taxonomy, the
//! product/price catalog, inventory (warehouses, bins, stock, transactions),
//! service (work orders and their part/labor lines), billing, procurement,
//! and the OEM part catalogs.

pub mod alert;
pub mod audit_log;
pub mod bin;
pub mod client;
pub mod equipment;
pub mod equipment_type;
pub mod fitment;
pub mod flat_rate_standard;
pub mod invoice;
pub mod invoice_item;
pub mod oem_brand;
pub mod oem_catalog_item;
pub mod oem_equivalence;
pub mod payment;
pub mod po_item;
pub mod price_list;
pub mod product;
pub mod product_price;
pub mod purchase_order;
pub mod stock;
pub mod stock_transaction;
pub mod supplier;
pub mod supplier_sku;
pub mod taxonomy_group;
pub mod taxonomy_subsystem;
pub mod taxonomy_system;
pub mod technician;
pub mod user;
pub mod warehouse;
pub mod wo_item;
pub mod wo_service;
pub mod work_order;
