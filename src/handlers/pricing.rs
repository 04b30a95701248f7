//! Price list and price resolution endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::common::{created_response, success_response};
use crate::auth::{perm, AuthRouterExt};
use crate::errors::ServiceError;
use crate::services::pricing::{CreatePriceListInput, SetPriceInput};
use crate::AppState;

fn default_qty() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub internal_sku: String,
    pub list_code: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default = "default_qty")]
    pub qty: i32,
}

#[derive(Debug, Deserialize)]
pub struct PriceListQuery {
    pub internal_sku: Option<String>,
}

async fn resolve_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let resolved = state
        .services
        .pricing
        .resolve_price(
            &query.internal_sku,
            query.list_code.as_deref(),
            query.date,
            query.qty,
        )
        .await?;
    Ok(success_response(resolved))
}

async fn create_price_list(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePriceListInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let list = state.services.pricing.create_price_list(payload).await?;
    Ok(created_response(list))
}

async fn list_price_lists(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let lists = state.services.pricing.list_price_lists().await?;
    Ok(success_response(lists))
}

async fn set_price(
    State(state): State<Arc<AppState>>,
    Path(list_code): Path<String>,
    Json(payload): Json<SetPriceInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let price = state.services.pricing.set_price(&list_code, payload).await?;
    Ok(created_response(price))
}

async fn list_prices(
    State(state): State<Arc<AppState>>,
    Path(list_code): Path<String>,
    Query(query): Query<PriceListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let prices = state
        .services
        .pricing
        .list_prices(&list_code, query.internal_sku.as_deref())
        .await?;
    Ok(success_response(prices))
}

pub fn pricing_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/resolve", get(resolve_price))
        .route("/lists", get(list_price_lists))
        .route("/lists/:code/prices", get(list_prices))
        .with_permission(perm::PRICING_READ);
    let manage = Router::new()
        .route("/lists", post(create_price_list))
        .route("/lists/:code/prices", post(set_price))
        .with_permission(perm::PRICING_MANAGE);
    read.merge(manage)
}
