//! Workshop management backend: clients, equipment, work orders,
//! inventory, invoicing, purchasing, pricing and OEM catalogs.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use std::sync::Arc;

use crate::db::DbPool;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: services::AppServices,
}

/// Full v1 API surface. Every group carries its own permission gate;
/// authentication itself happens in the middleware each gate attaches.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", axum::routing::get(handlers::health::api_status))
        .nest("/clients", handlers::client_routes())
        .nest("/technicians", handlers::technician_routes())
        .nest("/equipment", handlers::equipment_routes())
        .nest("/equipment-types", handlers::equipment_type_routes())
        .nest("/products", handlers::product_routes())
        .nest("/taxonomy", handlers::taxonomy_routes())
        .nest("/warehouses", handlers::warehouse_routes())
        .nest("/inventory", handlers::inventory_routes())
        .nest("/work-orders", handlers::work_order_routes())
        .nest("/flat-rates", handlers::flat_rate_routes())
        .nest("/invoices", handlers::invoice_routes())
        .nest("/suppliers", handlers::supplier_routes())
        .nest("/purchase-orders", handlers::purchase_order_routes())
        .nest("/pricing", handlers::pricing_routes())
        .nest("/catalog", handlers::oem_routes())
        .nest("/analytics", handlers::analytics_routes())
        .nest("/alerts", handlers::alert_routes())
        .nest("/audit", handlers::audit_routes())
}
