mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;

use forge_api::auth::{hash_password, AuthConfig, AuthService};
use forge_api::entities::user;
use forge_api::AppState;

use common::{test_config, TestCtx};

struct TestApp {
    router: Router,
    token: String,
}

impl TestApp {
    async fn new(role: &str) -> (TestCtx, Self) {
        let ctx = TestCtx::new().await;
        let cfg = test_config();

        let auth_service = Arc::new(AuthService::new(
            AuthConfig::from_app_config(&cfg),
            ctx.db.clone(),
        ));
        let account = user::ActiveModel {
            username: Set(format!("{role}-user")),
            email: Set(format!("{role}@example.test")),
            password_hash: Set(hash_password("hunter2hunter2").unwrap()),
            role: Set(role.to_string()),
            technician_id: Set(None),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*ctx.db)
        .await
        .expect("user");
        let token = auth_service
            .generate_token(&account)
            .expect("token")
            .access_token;

        let state = Arc::new(AppState {
            db: ctx.db.clone(),
            config: cfg,
            event_sender: ctx.event_sender.clone(),
            services: ctx.services.clone(),
        });
        let router = Router::new()
            .merge(forge_api::handlers::health_routes())
            .nest("/api/v1", forge_api::api_v1_routes())
            .layer(axum::Extension(auth_service))
            .with_state(state);

        (ctx, Self { router, token })
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

#[tokio::test]
async fn health_endpoints_answer_without_auth() {
    let (_ctx, app) = TestApp::new("admin").await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (_ctx, app) = TestApp::new("admin").await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/clients")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_create_and_list_clients() {
    let (_ctx, app) = TestApp::new("admin").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "client_code": "C900",
                "client_type": "COMPANY",
                "name": "Fleet Co"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["client_code"], "C900");
    assert_eq!(body["status"], "ACTIVE");

    let (status, body) = app.request(Method::GET, "/api/v1/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn technician_cannot_manage_clients() {
    let (_ctx, app) = TestApp::new("technician").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "client_code": "C901",
                "client_type": "INDIVIDUAL",
                "name": "Someone"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reading work orders stays allowed for the technician role.
    let (status, _) = app.request(Method::GET, "/api/v1/work-orders", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn illegal_status_jumps_return_conflict() {
    let (ctx, app) = TestApp::new("admin").await;
    let client = ctx.seed_client("C902").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ902").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/work-orders",
            Some(json!({
                "client_id": client.client_id,
                "equipment_id": unit.equipment_id,
                "service_type": "REPAIR"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let wo_id = body["wo_id"].as_i64().expect("id");

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/work-orders/{wo_id}/status"),
            Some(json!({ "status": "COMPLETED" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_work_order_is_a_404() {
    let (_ctx, app) = TestApp::new("admin").await;
    let (status, _) = app.request(Method::GET, "/api/v1/work-orders/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
