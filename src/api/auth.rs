//! Login and registration endpoints.
//!
//! Two roads lead to an admin token: the deployment-wide shared passphrase
//! (a credential-less identity with subject `admin`), or a user row whose
//! role column was pre-seeded to `admin`. Registration always creates role
//! `user`; there is no promotion endpoint.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::auth::{self, hash_password, verify_password, Role, ADMIN_SUBJECT};
use crate::db::{AdminLoginRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse, User};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_password, validate_username};

/// The public interface reports a taken username as 400
fn username_taken() -> ApiError {
    ApiError::conflict("Username already registered").with_status(StatusCode::BAD_REQUEST)
}

/// Two registrations racing past the existence check trip the unique index
/// on insert; the caller sees the same 400 either way.
fn map_register_insert_error(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE constraint failed") => {
            username_taken()
        }
        _ => ApiError::from(err),
    }
}

/// Shared-passphrase admin login.
///
/// POST /api/admin/login
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let expected = state.config.auth.admin_password.as_bytes();
    let provided = req.password.as_bytes();

    // Constant-time comparison; lengths must match first
    let matches = expected.len() == provided.len() && bool::from(expected.ct_eq(provided));
    if !matches {
        return Err(ApiError::unauthorized("Invalid admin password"));
    }

    let token = auth::issue_token(
        &state.config.auth.jwt_secret,
        ADMIN_SUBJECT,
        Role::Admin,
        Duration::minutes(state.config.auth.admin_token_ttl_minutes),
    )
    .map_err(|e| {
        tracing::error!("Failed to issue admin token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!("Admin login via shared passphrase");
    Ok(Json(TokenResponse::bearer(token)))
}

/// Register a new user account. The created role is always `user`.
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_username(&req.username) {
        errors.add("username", e);
    }
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&req.password) {
        errors.add("password", e);
    }
    errors.finish()?;

    // Existence check before insert; the unique index on username backstops it
    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&req.username)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(username_taken());
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, premium, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.username)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(Role::User.as_str())
    .bind(false)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(map_register_insert_error)?;

    tracing::info!(username = %req.username, "User registered");
    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// User login.
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&req.username)
        .fetch_optional(&state.db)
        .await?;

    // Unknown username and wrong password fail identically
    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let role = user.role.parse().unwrap_or(Role::User);
    let token = auth::issue_token(
        &state.config.auth.jwt_secret,
        &user.username,
        role,
        Duration::minutes(state.config.auth.user_token_ttl_minutes),
    )
    .map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    Ok(Json(TokenResponse::bearer(token)))
}
