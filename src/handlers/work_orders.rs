//! Work order endpoints: lifecycle, part and labor lines, stock
//! reservation and the flat-rate catalog.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::entities::work_order::WorkOrderStatus;
use crate::errors::ServiceError;
use crate::services::work_orders::{
    AddPartLineInput, AddServiceLineInput, CreateFlatRateInput, CreateWorkOrderInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkOrderListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
    pub client_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangePayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelPayload {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnPartPayload {
    pub item_id: i32,
    pub qty: i32,
}

#[derive(Debug, Deserialize)]
pub struct CompleteServicePayload {
    pub actual_hours: Decimal,
    pub technician_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct FlatRateListQuery {
    #[serde(default)]
    pub active_only: bool,
}

fn parse_status(raw: &str) -> Result<WorkOrderStatus, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::InvalidStatus(raw.to_string()))
}

async fn create_work_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWorkOrderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let wo = state.services.work_orders.create_work_order(payload).await?;
    Ok(created_response(wo))
}

async fn get_work_order(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let wo = state.services.work_orders.get_work_order(wo_id).await?;
    Ok(success_response(wo))
}

async fn list_work_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkOrderListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .work_orders
        .list_work_orders(status, query.client_id, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn change_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<StatusChangePayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let next = parse_status(&payload.status)?;
    let wo = state
        .services
        .work_orders
        .advance_status(wo_id, next, Some(user.user_id))
        .await?;
    Ok(success_response(wo))
}

async fn cancel_work_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<CancelPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let wo = state
        .services
        .work_orders
        .cancel_work_order(wo_id, payload.reason, Some(user.user_id))
        .await?;
    Ok(success_response(wo))
}

async fn add_part_line(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<AddPartLineInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let line = state
        .services
        .work_orders
        .add_part_line(wo_id, payload)
        .await?;
    Ok(created_response(line))
}

async fn part_lines(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let lines = state.services.work_orders.part_lines(wo_id).await?;
    Ok(success_response(lines))
}

async fn add_service_line(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<AddServiceLineInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let line = state
        .services
        .work_orders
        .add_service_line(wo_id, payload)
        .await?;
    Ok(created_response(line))
}

async fn service_lines(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let lines = state.services.work_orders.service_lines(wo_id).await?;
    Ok(success_response(lines))
}

async fn complete_service_line(
    State(state): State<Arc<AppState>>,
    Path((wo_id, service_id)): Path<(i32, i32)>,
    Json(payload): Json<CompleteServicePayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let line = state
        .services
        .work_orders
        .complete_service_line(wo_id, service_id, payload.actual_hours, payload.technician_id)
        .await?;
    Ok(success_response(line))
}

async fn cost_summary(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.work_orders.cost_summary(wo_id).await?;
    Ok(success_response(summary))
}

async fn reserve_parts(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let reserved = state
        .services
        .inventory
        .reserve_for_work_order(wo_id)
        .await?;
    Ok(success_response(reserved))
}

async fn release_parts(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let released = state
        .services
        .inventory
        .release_for_work_order(wo_id)
        .await?;
    Ok(success_response(serde_json::json!({ "released": released })))
}

async fn consume_parts(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let consumed = state
        .services
        .inventory
        .consume_for_work_order(wo_id)
        .await?;
    Ok(success_response(serde_json::json!({ "consumed": consumed })))
}

async fn return_part(
    State(state): State<Arc<AppState>>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<ReturnPartPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .inventory
        .return_for_work_order(wo_id, payload.item_id, payload.qty)
        .await?;
    Ok(success_response(serde_json::json!({ "returned": payload.qty })))
}

async fn create_flat_rate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFlatRateInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let standard = state
        .services
        .work_orders
        .create_flat_rate_standard(payload)
        .await?;
    Ok(created_response(standard))
}

async fn list_flat_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlatRateListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let standards = state
        .services
        .work_orders
        .list_flat_rate_standards(query.active_only)
        .await?;
    Ok(success_response(standards))
}

pub fn work_order_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_work_orders))
        .route("/:id", get(get_work_order))
        .route("/:id/parts", get(part_lines))
        .route("/:id/services", get(service_lines))
        .route("/:id/costs", get(cost_summary))
        .with_permission(perm::WORKORDERS_READ);
    let create = Router::new()
        .route("/", post(create_work_order))
        .with_permission(perm::WORKORDERS_CREATE);
    let update = Router::new()
        .route("/:id/status", post(change_status))
        .route("/:id/cancel", post(cancel_work_order))
        .route("/:id/parts", post(add_part_line))
        .route("/:id/services", post(add_service_line))
        .route(
            "/:id/services/:service_id/complete",
            post(complete_service_line),
        )
        .route("/:id/reserve", post(reserve_parts))
        .route("/:id/release", post(release_parts))
        .route("/:id/consume", post(consume_parts))
        .route("/:id/return", post(return_part))
        .with_permission(perm::WORKORDERS_UPDATE);
    read.merge(create).merge(update)
}

pub fn flat_rate_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_flat_rates))
        .with_permission(perm::WORKORDERS_READ);
    let manage = Router::new()
        .route("/", post(create_flat_rate))
        .with_permission(perm::WORKORDERS_UPDATE);
    read.merge(manage)
}
