//! Client and technician endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::{
    created_response, no_content_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::{perm, AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::services::clients::{CreateClientInput, CreateTechnicianInput, UpdateClientInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub search: Option<String>,
    pub status: Option<String>,
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateClientInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state
        .services
        .clients
        .create_client(payload, Some(user.user_id))
        .await?;
    Ok(created_response(client))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.services.clients.get_client(client_id).await?;
    Ok(success_response(client))
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination.page();
    let per_page = query.pagination.per_page();
    let (rows, total) = state
        .services
        .clients
        .list_clients(
            query.search.as_deref(),
            query.status.as_deref(),
            page,
            per_page,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(client_id): Path<i32>,
    Json(payload): Json<UpdateClientInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state
        .services
        .clients
        .update_client(client_id, payload, Some(user.user_id))
        .await?;
    Ok(success_response(client))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .clients
        .delete_client(client_id, Some(user.user_id))
        .await?;
    Ok(no_content_response())
}

async fn client_equipment(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.get_client(client_id).await?;
    let page = pagination.page();
    let per_page = pagination.per_page();
    let (rows, total) = state
        .services
        .equipment
        .list_equipment(Some(client_id), None, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

async fn create_technician(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTechnicianInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let technician = state.services.clients.create_technician(payload).await?;
    Ok(created_response(technician))
}

#[derive(Debug, Deserialize)]
pub struct TechnicianListQuery {
    #[serde(default)]
    pub active_only: bool,
}

async fn list_technicians(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TechnicianListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let technicians = state
        .services
        .clients
        .list_technicians(query.active_only)
        .await?;
    Ok(success_response(technicians))
}

async fn get_technician(
    State(state): State<Arc<AppState>>,
    Path(technician_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let technician = state
        .services
        .clients
        .get_technician(technician_id)
        .await?;
    Ok(success_response(technician))
}

async fn deactivate_technician(
    State(state): State<Arc<AppState>>,
    Path(technician_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let technician = state
        .services
        .clients
        .deactivate_technician(technician_id)
        .await?;
    Ok(success_response(technician))
}

pub fn client_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
        .route("/:id/equipment", get(client_equipment))
        .with_permission(perm::CLIENTS_READ);
    let manage = Router::new()
        .route("/", post(create_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
        .with_permission(perm::CLIENTS_MANAGE);
    read.merge(manage)
}

pub fn technician_routes() -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/", get(list_technicians))
        .route("/:id", get(get_technician))
        .with_permission(perm::CLIENTS_READ);
    let manage = Router::new()
        .route("/", post(create_technician))
        .route("/:id/deactivate", post(deactivate_technician))
        .with_permission(perm::CLIENTS_MANAGE);
    read.merge(manage)
}
