//! Product master, taxonomy and warehouse endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::common::{
    created_response, no_content_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::{perm, AuthRouterExt};
use crate::entities::{taxonomy_group, taxonomy_subsystem, taxonomy_system};
use crate::errors::ServiceError;
use crate::services::products::{
    CreateBinInput, CreateProductInput, CreateWarehouseInput, UpdateProductInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub search: Option<String>,
    pub group_code: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

/// Taxonomy tree as returned by the API.
#[derive(Debug, Serialize)]
struct TaxonomyNode {
    #[serde(flatten)]
    system: taxonomy_system::Model,
    subsystems: Vec<TaxonomySubNode>,
}

#[derive(Debug, Serialize)]
struct TaxonomySubNode {
    #[serde(flatten)]
    subsystem: taxonomy_subsystem::Model,
    groups: Vec<taxonomy_group::Model>,
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.services.products.create_product(payload).await?;
    Ok(created_response(product))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(internal_sku): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.services.products.get_product(&internal_sku).await?;
    Ok(success_response(product))
}

async fn product_stock(
    State(state): State<Arc<AppState>>,
    Path(internal_sku): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let overview = state.services.products.stock_overview(&internal_sku).await?;
    Ok(success_response(overview))
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .products
        .list_products(
            query.search.as_deref(),
            query.group_code.as_deref(),
            query.active_only,
            page,
            per_page,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(internal_sku): Path<String>,
    Json(payload): Json<UpdateProductInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state
        .services
        .products
        .update_product(&internal_sku, payload)
        .await?;
    Ok(success_response(product))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(internal_sku): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.delete_product(&internal_sku).await?;
    Ok(no_content_response())
}

async fn taxonomy_tree(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let tree = state.services.products.taxonomy_tree().await?;
    let nodes: Vec<TaxonomyNode> = tree
        .into_iter()
        .map(|(system, subsystems)| TaxonomyNode {
            system,
            subsystems: subsystems
                .into_iter()
                .map(|(subsystem, groups)| TaxonomySubNode { subsystem, groups })
                .collect(),
        })
        .collect();
    Ok(success_response(nodes))
}

async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWarehouseInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse = state.services.products.create_warehouse(payload).await?;
    Ok(created_response(warehouse))
}

async fn list_warehouses(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouses = state.services.products.list_warehouses().await?;
    Ok(success_response(warehouses))
}

async fn delete_warehouse(
    State(state): State<Arc<AppState>>,
    Path(warehouse_code): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .products
        .delete_warehouse(&warehouse_code)
        .await?;
    Ok(no_content_response())
}

async fn create_bin(
    State(state): State<Arc<AppState>>,
    Path(warehouse_code): Path<String>,
    Json(payload): Json<CreateBinInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let bin = state
        .services
        .products
        .create_bin(&warehouse_code, payload)
        .await?;
    Ok(created_response(bin))
}

async fn list_bins(
    State(state): State<Arc<AppState>>,
    Path(warehouse_code): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let bins = state.services.products.list_bins(&warehouse_code).await?;
    Ok(success_response(bins))
}

pub fn product_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_products))
        .route("/:sku", get(get_product))
        .route("/:sku/stock", get(product_stock))
        .with_permission(perm::PRODUCTS_READ);
    let manage = Router::new()
        .route("/", post(create_product))
        .route("/:sku", put(update_product))
        .route("/:sku", delete(delete_product))
        .with_permission(perm::PRODUCTS_MANAGE);
    read.merge(manage)
}

pub fn taxonomy_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tree", get(taxonomy_tree))
        .with_permission(perm::PRODUCTS_READ)
}

pub fn warehouse_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_warehouses))
        .route("/:code/bins", get(list_bins))
        .with_permission(perm::INVENTORY_READ);
    let manage = Router::new()
        .route("/", post(create_warehouse))
        .route("/:code", delete(delete_warehouse))
        .route("/:code/bins", post(create_bin))
        .with_permission(perm::INVENTORY_MANAGE);
    read.merge(manage)
}
