//! Token service and authorization gate.
//!
//! Bearer tokens are stateless HS256 JWTs carrying a subject, a role, and an
//! expiry. Validation never consults the user store: a token stays valid
//! until its expiry even if the account behind it is deleted or demoted in
//! the meantime. There is no refresh and no revocation list.

mod password;

pub use password::{hash_password, verify_password};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::AppState;

/// Subject claim used by tokens from the shared-passphrase admin login
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Signature did not verify, token malformed, or expiry passed
    #[error("invalid or expired token")]
    Invalid,
    /// No bearer token was presented
    #[error("authentication required")]
    Unauthenticated,
    /// Token is valid but the role claim is insufficient
    #[error("admin access required")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::Invalid),
        }
    }
}

/// Claim set embedded in every issued token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity: a username, or `admin` for the shared passphrase
    pub sub: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issue a signed bearer token valid for `ttl` from now.
pub fn issue_token(
    secret: &str,
    subject: &str,
    role: Role,
    ttl: Duration,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: (Utc::now() + ttl).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a bearer token and return its claim set.
///
/// Fails with [`AuthError::Invalid`] on a bad signature, malformed
/// structure, or a passed expiry.
pub fn validate_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::Invalid)
}

/// Pull the token out of a standard `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, AuthError> {
    let token = bearer_token(parts).ok_or(AuthError::Unauthenticated)?;
    validate_token(&state.config.auth.jwt_secret, token)
}

/// Extractor enforcing the admin gate on mutating routes.
///
/// Missing or invalid tokens reject with 401, a valid token whose role is
/// not `admin` rejects with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;
        if claims.role != Role::Admin {
            return Err(AuthError::Forbidden.into());
        }
        Ok(AdminUser(claims))
    }
}
