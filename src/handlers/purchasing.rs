//! Supplier and purchase order endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::entities::purchase_order::PurchaseOrderStatus;
use crate::errors::ServiceError;
use crate::services::purchasing::{
    CreatePurchaseOrderInput, CreateSupplierInput, ReceiveLineInput, SupplierSkuInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseOrderListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
    pub supplier_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangePayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReceivePayload {
    pub lines: Vec<ReceiveLineInput>,
}

async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSupplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.purchasing.create_supplier(payload).await?;
    Ok(created_response(supplier))
}

async fn get_supplier(
    State(state): State<Arc<AppState>>,
    Path(supplier_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.purchasing.get_supplier(supplier_id).await?;
    Ok(success_response(supplier))
}

async fn list_suppliers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state.services.purchasing.list_suppliers().await?;
    Ok(success_response(suppliers))
}

async fn upsert_supplier_sku(
    State(state): State<Arc<AppState>>,
    Path(supplier_id): Path<i32>,
    Json(payload): Json<SupplierSkuInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let mapping = state
        .services
        .purchasing
        .upsert_supplier_sku(supplier_id, payload)
        .await?;
    Ok(success_response(mapping))
}

async fn supplier_skus(
    State(state): State<Arc<AppState>>,
    Path(supplier_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let mappings = state.services.purchasing.supplier_skus(supplier_id).await?;
    Ok(success_response(mappings))
}

async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePurchaseOrderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state
        .services
        .purchasing
        .create_purchase_order(payload)
        .await?;
    Ok(created_response(detail))
}

async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(po_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.purchasing.get_purchase_order(po_id).await?;
    Ok(success_response(detail))
}

async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<PurchaseOrderStatus>()
                .map_err(|_| ServiceError::InvalidStatus(raw.to_string()))
        })
        .transpose()?;
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .purchasing
        .list_purchase_orders(status, query.supplier_id, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn change_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(po_id): Path<i32>,
    Json(payload): Json<StatusChangePayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let next: PurchaseOrderStatus = payload
        .status
        .parse()
        .map_err(|_| ServiceError::InvalidStatus(payload.status.clone()))?;
    let po = state
        .services
        .purchasing
        .advance_status(po_id, next, Some(user.user_id))
        .await?;
    Ok(success_response(po))
}

async fn receive_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(po_id): Path<i32>,
    Json(payload): Json<ReceivePayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state
        .services
        .purchasing
        .receive_items(po_id, payload.lines, Some(user.user_id))
        .await?;
    Ok(success_response(detail))
}

pub fn supplier_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id/skus", get(supplier_skus))
        .with_permission(perm::SUPPLIERS_READ);
    let manage = Router::new()
        .route("/", post(create_supplier))
        .route("/:id/skus", put(upsert_supplier_sku))
        .with_permission(perm::SUPPLIERS_MANAGE);
    read.merge(manage)
}

pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .with_permission(perm::PURCHASING_READ);
    let manage = Router::new()
        .route("/", post(create_purchase_order))
        .route("/:id/status", post(change_status))
        .route("/:id/receive", post(receive_items))
        .with_permission(perm::PURCHASING_MANAGE);
    read.merge(manage)
}
