use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::user;

/// Permission constants, grouped as `resource:action`.
pub mod perm {
    pub const CLIENTS_READ: &str = "clients:read";
    pub const CLIENTS_MANAGE: &str = "clients:manage";

    pub const EQUIPMENT_READ: &str = "equipment:read";
    pub const EQUIPMENT_MANAGE: &str = "equipment:manage";

    pub const PRODUCTS_READ: &str = "products:read";
    pub const PRODUCTS_MANAGE: &str = "products:manage";

    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_MANAGE: &str = "inventory:manage";

    pub const WORKORDERS_READ: &str = "workorders:read";
    pub const WORKORDERS_CREATE: &str = "workorders:create";
    pub const WORKORDERS_UPDATE: &str = "workorders:update";

    pub const INVOICES_READ: &str = "invoices:read";
    pub const INVOICES_MANAGE: &str = "invoices:manage";

    pub const SUPPLIERS_READ: &str = "suppliers:read";
    pub const SUPPLIERS_MANAGE: &str = "suppliers:manage";

    pub const PURCHASING_READ: &str = "purchasing:read";
    pub const PURCHASING_MANAGE: &str = "purchasing:manage";

    pub const PRICING_READ: &str = "pricing:read";
    pub const PRICING_MANAGE: &str = "pricing:manage";

    pub const CATALOG_READ: &str = "catalog:read";
    pub const CATALOG_MANAGE: &str = "catalog:manage";

    pub const REPORTS_READ: &str = "reports:read";
    pub const ALERTS_READ: &str = "alerts:read";
    pub const ALERTS_MANAGE: &str = "alerts:manage";

    pub const USERS_MANAGE: &str = "users:manage";
}

/// Expands a user role into its permission set. The "admin" role is
/// also special-cased in the permission middleware, which lets admins
/// through regardless of this list.
pub fn role_permissions(role: &str) -> Vec<String> {
    use perm::*;

    let perms: &[&str] = match role {
        "admin" => &[
            CLIENTS_READ, CLIENTS_MANAGE, EQUIPMENT_READ, EQUIPMENT_MANAGE, PRODUCTS_READ,
            PRODUCTS_MANAGE, INVENTORY_READ, INVENTORY_MANAGE, WORKORDERS_READ, WORKORDERS_CREATE,
            WORKORDERS_UPDATE, INVOICES_READ, INVOICES_MANAGE, SUPPLIERS_READ, SUPPLIERS_MANAGE,
            PURCHASING_READ, PURCHASING_MANAGE, PRICING_READ, PRICING_MANAGE, CATALOG_READ,
            CATALOG_MANAGE, REPORTS_READ, ALERTS_READ, ALERTS_MANAGE, USERS_MANAGE,
        ],
        "advisor" => &[
            CLIENTS_READ, CLIENTS_MANAGE, EQUIPMENT_READ, EQUIPMENT_MANAGE, PRODUCTS_READ,
            INVENTORY_READ, WORKORDERS_READ, WORKORDERS_CREATE, WORKORDERS_UPDATE, INVOICES_READ,
            INVOICES_MANAGE, PRICING_READ, CATALOG_READ, REPORTS_READ, ALERTS_READ,
        ],
        "technician" => &[
            CLIENTS_READ, EQUIPMENT_READ, PRODUCTS_READ, INVENTORY_READ, WORKORDERS_READ,
            WORKORDERS_UPDATE, CATALOG_READ,
        ],
        "inventory" => &[
            PRODUCTS_READ, PRODUCTS_MANAGE, INVENTORY_READ, INVENTORY_MANAGE, SUPPLIERS_READ,
            SUPPLIERS_MANAGE, PURCHASING_READ, PURCHASING_MANAGE, PRICING_READ, PRICING_MANAGE,
            CATALOG_READ, CATALOG_MANAGE, REPORTS_READ, ALERTS_READ, ALERTS_MANAGE,
        ],
        other => {
            warn!(role = %other, "unknown role, granting no permissions");
            &[]
        }
    };

    perms.iter().map(|p| p.to_string()).collect()
}

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
}

impl AuthConfig {
    pub fn from_app_config(cfg: &crate::config::AppConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_issuer: cfg.auth_issuer.clone(),
            jwt_audience: cfg.auth_audience.clone(),
            access_token_expiration: Duration::from_secs(cfg.jwt_expiration as u64),
            refresh_token_expiration: Duration::from_secs(cfg.refresh_token_expiration as u64),
        }
    }
}

/// Authentication service that handles token issuance and validation
#[derive(Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Generate an access/refresh token pair for a user.
    pub fn generate_token(&self, user: &user::Model) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;
        let refresh_exp = now
            + ChronoDuration::from_std(self.config.refresh_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let roles = vec![user.role.clone()];
        let permissions = role_permissions(&user.role);

        let access_claims = Claims {
            sub: user.user_id.to_string(),
            username: Some(user.username.clone()),
            roles: roles.clone(),
            permissions,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        // Refresh token carries minimal data
        let refresh_claims = Claims {
            sub: user.user_id.to_string(),
            username: None,
            roles: vec![],
            permissions: vec![],
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let access_token = encode(&Header::new(Algorithm::HS256), &access_claims, &key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?;
        let refresh_token = encode(&Header::new(Algorithm::HS256), &refresh_claims, &key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            refresh_expires_in: self.config.refresh_token_expiration.as_secs() as i64,
        })
    }

    /// Validate a JWT token and extract the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(claims)
    }

    /// Authenticate a username/password pair against the users table.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let account = found.ok_or(AuthError::InvalidCredentials)?;
        if !account.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        if !verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.generate_token(&account)?;

        let mut active: user::ActiveModel = account.into();
        active.last_login_at = Set(Some(Utc::now()));
        active
            .update(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        Ok(tokens)
    }

    /// Loads the account behind an authenticated user id.
    pub async fn profile(&self, user_id: i32) -> Result<user::Model, AuthError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::InvalidToken)
    }

    /// Verifies the current password and stores a new Argon2 hash.
    pub async fn change_password(
        &self,
        user_id: i32,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        if new.len() < 8 {
            return Err(AuthError::WeakPassword);
        }
        let account = self.profile(user_id).await?;
        if !verify_password(current, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        let mut active: user::ActiveModel = account.into();
        active.password_hash = Set(hash_password(new)?);
        active
            .update(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?;
        Ok(())
    }

    /// Refresh an access token using a refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token)?;

        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        if !account.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        self.generate_token(&account)
    }
}

/// Hash a password with Argon2id and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::InternalError(e.to_string()))
}

/// Verify a password against a stored Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Password too weak")]
    WeakPassword,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Internal auth error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Missing authentication"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Insufficient permissions")
            }
            AuthError::WeakPassword => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Password must be at least 8 characters",
            ),
            AuthError::TokenCreation(_) | AuthError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": status.canonical_reason().unwrap_or("Error"),
                "message": message,
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}

/// Extract authentication info from request headers.
fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if let Some(token) = auth_value.strip_prefix("Bearer ") {
                let claims = auth_service.validate_token(token.trim())?;
                let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

                return Ok(AuthUser {
                    user_id,
                    username: claims.username,
                    roles: claims.roles,
                    permissions: claims.permissions,
                    token_id: claims.jti,
                });
            }
        }
    }

    Err(AuthError::MissingAuth)
}

/// Authentication middleware that validates the bearer token and stores
/// the resulting AuthUser in request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Permission middleware. Admins pass every check.
pub async fn permission_middleware(
    State(required_permission): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingAuth)?;

    if user.is_admin() || user.has_permission(&required_permission) {
        return Ok(next.run(request).await);
    }

    Err(AuthError::InsufficientPermissions)
}

/// Login handler
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<TokenPair>, AuthError> {
    let tokens = auth_service
        .login(&credentials.username, &credentials.password)
        .await?;
    Ok(Json(tokens))
}

/// Refresh token handler
pub async fn refresh_token_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(refresh_request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let tokens = auth_service
        .refresh_token(&refresh_request.refresh_token)
        .await?;
    Ok(Json(tokens))
}

/// Profile handler for the authenticated user
pub async fn profile_handler(
    State(auth_service): State<Arc<AuthService>>,
    axum::Extension(user): axum::Extension<AuthUser>,
) -> Result<Json<user::Model>, AuthError> {
    let account = auth_service.profile(user.user_id).await?;
    Ok(Json(account))
}

/// Change-password handler for the authenticated user
pub async fn change_password_handler(
    State(auth_service): State<Arc<AuthService>>,
    axum::Extension(user): axum::Extension<AuthUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    auth_service
        .change_password(
            user.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    let open = axum::Router::new()
        .route("/login", axum::routing::post(login_handler))
        .route("/refresh", axum::routing::post(refresh_token_handler));
    let authed = axum::Router::new()
        .route("/me", axum::routing::get(profile_handler))
        .route(
            "/change-password",
            axum::routing::post(change_password_handler),
        )
        .with_auth();
    open.merge(authed)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, permission: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, permission: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            permission.to_string(),
            permission_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_covers_user_management() {
        let perms = role_permissions("admin");
        assert!(perms.contains(&perm::USERS_MANAGE.to_string()));
        assert!(perms.contains(&perm::INVENTORY_MANAGE.to_string()));
    }

    #[test]
    fn technician_cannot_manage_inventory() {
        let perms = role_permissions("technician");
        assert!(perms.contains(&perm::WORKORDERS_UPDATE.to_string()));
        assert!(!perms.contains(&perm::INVENTORY_MANAGE.to_string()));
        assert!(!perms.contains(&perm::INVOICES_MANAGE.to_string()));
    }

    #[test]
    fn unknown_role_gets_nothing() {
        assert!(role_permissions("intern").is_empty());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
