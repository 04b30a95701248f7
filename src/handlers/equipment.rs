//! Equipment and equipment type endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{
    created_response, no_content_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::{perm, AuthRouterExt};
use crate::errors::ServiceError;
use crate::services::equipment::{
    CreateEquipmentInput, CreateEquipmentTypeInput, UpdateEquipmentInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EquipmentListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub client_id: Option<i32>,
    pub search: Option<String>,
}

async fn create_equipment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEquipmentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = state.services.equipment.create_equipment(payload).await?;
    Ok(created_response(unit))
}

async fn get_equipment(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = state.services.equipment.get_equipment(equipment_id).await?;
    Ok(success_response(unit))
}

async fn list_equipment(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EquipmentListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .equipment
        .list_equipment(query.client_id, query.search.as_deref(), page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn update_equipment(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<i32>,
    Json(payload): Json<UpdateEquipmentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = state
        .services
        .equipment
        .update_equipment(equipment_id, payload)
        .await?;
    Ok(success_response(unit))
}

async fn delete_equipment(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .equipment
        .delete_equipment(equipment_id)
        .await?;
    Ok(no_content_response())
}

async fn compatible_parts(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let parts = state.services.oem.parts_for_equipment(equipment_id).await?;
    Ok(success_response(parts))
}

async fn create_equipment_type(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEquipmentTypeInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let kind = state
        .services
        .equipment
        .create_equipment_type(payload)
        .await?;
    Ok(created_response(kind))
}

async fn list_equipment_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let kinds = state.services.equipment.list_equipment_types().await?;
    Ok(success_response(kinds))
}

pub fn equipment_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_equipment))
        .route("/:id", get(get_equipment))
        .route("/:id/compatible-parts", get(compatible_parts))
        .with_permission(perm::EQUIPMENT_READ);
    let manage = Router::new()
        .route("/", post(create_equipment))
        .route("/:id", put(update_equipment))
        .route("/:id", delete(delete_equipment))
        .with_permission(perm::EQUIPMENT_MANAGE);
    read.merge(manage)
}

pub fn equipment_type_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_equipment_types))
        .with_permission(perm::EQUIPMENT_READ);
    let manage = Router::new()
        .route("/", post(create_equipment_type))
        .with_permission(perm::EQUIPMENT_MANAGE);
    read.merge(manage)
}
