//! OEM catalog endpoints: brands, parts, equivalences and fitments.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::{perm, AuthRouterExt};
use crate::errors::ServiceError;
use crate::services::oem::{
    CreateBrandInput, CreateCatalogItemInput, CreateEquivalenceInput, CreateFitmentInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogSearchQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub q: String,
    pub brand_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LinkSkuPayload {
    #[validate(length(min = 1))]
    pub internal_sku: String,
}

async fn create_brand(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBrandInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let brand = state.services.oem.create_brand(payload).await?;
    Ok(created_response(brand))
}

async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let brands = state.services.oem.list_brands().await?;
    Ok(success_response(brands))
}

async fn create_catalog_item(
    State(state): State<Arc<AppState>>,
    Path(brand_code): Path<String>,
    Json(payload): Json<CreateCatalogItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .oem
        .create_catalog_item(&brand_code, payload)
        .await?;
    Ok(created_response(item))
}

async fn get_catalog_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.oem.get_catalog_item(item_id).await?;
    Ok(success_response(item))
}

async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogSearchQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .oem
        .search_catalog(&query.q, query.brand_code.as_deref(), page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn link_internal_sku(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(payload): Json<LinkSkuPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state
        .services
        .oem
        .link_internal_sku(item_id, &payload.internal_sku)
        .await?;
    Ok(success_response(item))
}

async fn create_equivalence(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(payload): Json<CreateEquivalenceInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let link = state
        .services
        .oem
        .create_equivalence(item_id, payload)
        .await?;
    Ok(created_response(link))
}

async fn equivalents(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let hits = state.services.oem.equivalents(item_id).await?;
    Ok(success_response(hits))
}

async fn current_replacement(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.oem.current_replacement(item_id).await?;
    Ok(success_response(item))
}

async fn create_fitment(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(payload): Json<CreateFitmentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let fitment = state.services.oem.create_fitment(item_id, payload).await?;
    Ok(created_response(fitment))
}

pub fn oem_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/brands", get(list_brands))
        .route("/parts/search", get(search_catalog))
        .route("/parts/:id", get(get_catalog_item))
        .route("/parts/:id/equivalences", get(equivalents))
        .route("/parts/:id/replacement", get(current_replacement))
        .with_permission(perm::CATALOG_READ);
    let manage = Router::new()
        .route("/brands", post(create_brand))
        .route("/brands/:code/parts", post(create_catalog_item))
        .route("/parts/:id/link-sku", put(link_internal_sku))
        .route("/parts/:id/equivalences", post(create_equivalence))
        .route("/parts/:id/fitments", post(create_fitment))
        .with_permission(perm::CATALOG_MANAGE);
    read.merge(manage)
}
