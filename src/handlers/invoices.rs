//! Invoicing endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::entities::invoice::InvoiceStatus;
use crate::errors::ServiceError;
use crate::services::invoicing::{CreateInvoiceInput, RecordPaymentInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
    pub client_id: Option<i32>,
}

async fn create_from_work_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(wo_id): Path<i32>,
    Json(payload): Json<CreateInvoiceInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state
        .services
        .invoicing
        .create_from_work_order(wo_id, payload, Some(user.user_id))
        .await?;
    Ok(created_response(detail))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.invoicing.get_invoice(invoice_id).await?;
    Ok(success_response(detail))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InvoiceListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<InvoiceStatus>()
                .map_err(|_| ServiceError::InvalidStatus(raw.to_string()))
        })
        .transpose()?;
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .invoicing
        .list_invoices(status, query.client_id, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn send_invoice(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state
        .services
        .invoicing
        .send_invoice(invoice_id, Some(user.user_id))
        .await?;
    Ok(success_response(invoice))
}

async fn record_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(invoice_id): Path<i32>,
    Json(payload): Json<RecordPaymentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .invoicing
        .record_payment(invoice_id, payload, Some(user.user_id))
        .await?;
    Ok(created_response(payment))
}

async fn mark_overdue(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let marked = state.services.invoicing.mark_overdue_invoices().await?;
    Ok(success_response(serde_json::json!({ "marked_overdue": marked })))
}

pub fn invoice_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
        .with_permission(perm::INVOICES_READ);
    let manage = Router::new()
        .route("/from-work-order/:id", post(create_from_work_order))
        .route("/:id/send", post(send_invoice))
        .route("/:id/payments", post(record_payment))
        .route("/mark-overdue", post(mark_overdue))
        .with_permission(perm::INVOICES_MANAGE);
    read.merge(manage)
}
