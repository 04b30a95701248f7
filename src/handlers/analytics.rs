//! Dashboard, ABC classification, consistency checks and alerts.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::entities::alert::AlertType;
use crate::errors::ServiceError;
use crate::AppState;

const DEFAULT_ABC_WINDOW_DAYS: i64 = 365;

fn default_window() -> i64 {
    DEFAULT_ABC_WINDOW_DAYS
}

#[derive(Debug, Deserialize)]
pub struct AbcQuery {
    #[serde(default = "default_window")]
    pub window_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct AlertListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(default)]
    pub unresolved_only: bool,
    pub alert_type: Option<String>,
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ServiceError> {
    let dashboard = state.services.analytics.dashboard().await?;
    Ok(success_response(dashboard))
}

async fn abc_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AbcQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .analytics
        .abc_analysis(query.window_days)
        .await?;
    Ok(success_response(rows))
}

async fn stock_consistency(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state.services.analytics.stock_consistency_check().await?;
    Ok(success_response(report))
}

async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlertListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let alert_type = query
        .alert_type
        .as_deref()
        .map(|raw| {
            raw.parse::<AlertType>()
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown alert type {}", raw)))
        })
        .transpose()?;
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .audit
        .list_alerts(query.unresolved_only, alert_type, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(alert_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let alert = state
        .services
        .audit
        .resolve_alert(alert_id, Some(user.user_id))
        .await?;
    Ok(success_response(alert))
}

async fn audit_history(
    State(state): State<Arc<AppState>>,
    Path((table_name, record_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .audit
        .history(&table_name, &record_id)
        .await?;
    Ok(success_response(rows))
}

pub fn analytics_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/abc", get(abc_analysis))
        .with_permission(perm::REPORTS_READ);
    let sweep = Router::new()
        .route("/stock-consistency", post(stock_consistency))
        .with_permission(perm::INVENTORY_MANAGE);
    read.merge(sweep)
}

pub fn alert_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_alerts))
        .with_permission(perm::ALERTS_READ);
    let manage = Router::new()
        .route("/:id/resolve", post(resolve_alert))
        .with_permission(perm::ALERTS_MANAGE);
    read.merge(manage)
}

pub fn audit_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:table/:record", get(audit_history))
        .with_permission(perm::REPORTS_READ)
}
