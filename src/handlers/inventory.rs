//! Stock level, movement and replenishment endpoints.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::common::{success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub warehouse_code: Option<String>,
    pub internal_sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WarehouseFilter {
    pub warehouse_code: Option<String>,
}

fn default_aging_months() -> u32 {
    12
}

#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    pub warehouse_code: Option<String>,
    #[serde(default = "default_aging_months")]
    pub months: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReceiveStockPayload {
    #[validate(length(min = 1))]
    pub warehouse_code: String,
    #[validate(length(min = 1))]
    pub internal_sku: String,
    pub qty: i32,
    pub unit_cost: Decimal,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustStockPayload {
    #[validate(length(min = 1))]
    pub warehouse_code: String,
    #[validate(length(min = 1))]
    pub internal_sku: String,
    pub new_qty: i32,
    #[validate(length(min = 1))]
    pub reason: String,
}

async fn stock_levels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .inventory
        .stock_levels(
            query.warehouse_code.as_deref(),
            query.internal_sku.as_deref(),
            page,
            per_page,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn movements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .inventory
        .movements(
            query.warehouse_code.as_deref(),
            query.internal_sku.as_deref(),
            page,
            per_page,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn receive_stock(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReceiveStockPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let row = state
        .services
        .inventory
        .receive_stock(
            &payload.warehouse_code,
            &payload.internal_sku,
            payload.qty,
            payload.unit_cost,
            Some("manual_receipt"),
            None,
            payload.reference_number.as_deref(),
            Some(user.user_id),
        )
        .await?;
    Ok(success_response(row))
}

async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let row = state
        .services
        .inventory
        .adjust_stock(
            &payload.warehouse_code,
            &payload.internal_sku,
            payload.new_qty,
            &payload.reason,
            Some(user.user_id),
        )
        .await?;
    Ok(success_response(row))
}

async fn run_replenishment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<WarehouseFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .inventory
        .auto_replenishment(filter.warehouse_code.as_deref(), Some(user.user_id))
        .await?;
    Ok(success_response(report))
}

async fn aging_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgingQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .inventory
        .inventory_aging(query.warehouse_code.as_deref(), query.months)
        .await?;
    Ok(success_response(rows))
}

pub fn inventory_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/stock", get(stock_levels))
        .route("/movements", get(movements))
        .route("/aging", get(aging_report))
        .with_permission(perm::INVENTORY_READ);
    let manage = Router::new()
        .route("/receive", post(receive_stock))
        .route("/adjust", post(adjust_stock))
        .route("/replenishment", post(run_replenishment))
        .with_permission(perm::INVENTORY_MANAGE);
    read.merge(manage)
}
