//! Bearer-token authentication and role checks.
//!
//! Token issuance lives with the identity collaborator; this module only
//! verifies HS256 bearer tokens and exposes the caller's claims to the
//! handlers through extractors. `AuthUser` admits any valid token,
//! `AdminUser` additionally requires the `role` claim to be `"Admin"`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use store::EntityStore;

use crate::error::ApiError;
use crate::routes::AppState;

/// Role literal that unlocks the admin-only endpoints.
pub const ADMIN_ROLE: &str = "Admin";

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the caller's identity.
    pub sub: String,
    /// Role claim, `"Admin"` or `"User"`.
    pub role: String,
    /// Expiry as a unix timestamp; enforced during decoding.
    pub exp: i64,
}

/// Verification material shared across handlers.
#[derive(Clone)]
pub struct AuthKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    /// Builds HS256 verification keys from the shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decodes and validates a bearer token, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))
}

/// Any authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<Arc<AppState<S>>> for AuthUser
where
    S: EntityStore + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.auth.verify(token)?;
        Ok(AuthUser(claims))
    }
}

/// An authenticated caller holding the Admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<Arc<AppState<S>>> for AdminUser
where
    S: EntityStore + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.role != ADMIN_ROLE {
            return Err(ApiError::Forbidden("Admin role required".to_string()));
        }
        Ok(AdminUser(claims))
    }
}
