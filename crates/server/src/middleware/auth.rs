//! Authentication middleware and extractors.
//!
//! Requests authenticate with a bearer JWT carrying the subject's user ID
//! and role. Extractors verify the signature and expiry and hand handlers a
//! [`CurrentUser`]; role checks beyond "is an admin" go through
//! [`crate::policy`] inside the handler.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{Algorithm, Validation, decode};
use serde::{Deserialize, Serialize};

use lustra_core::{Role, UserId};

use crate::error::ApiError;
use crate::models::user::CurrentUser;
use crate::state::AppState;

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's ID.
    pub sub: i64,
    /// The user's role at token issue time.
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// The authenticated identity these claims describe.
    #[must_use]
    pub const fn current_user(&self) -> CurrentUser {
        CurrentUser {
            id: UserId::new(self.sub),
            role: self.role,
        }
    }
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
        let claims = decode_claims(token, state)?;
        Ok(Self(claims.current_user()))
    }
}

/// Extractor that requires a valid bearer token belonging to an admin.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("admin access required".to_string()));
        }
        Ok(Self(user))
    }
}

/// Extractor that optionally identifies the caller.
///
/// Unlike `RequireAuth`, an absent or invalid token yields `None` instead of
/// rejecting the request. Used on public endpoints that personalize when a
/// viewer happens to be logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts)
            .and_then(|token| decode_claims(token, state).ok())
            .map(|claims| claims.current_user());
        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Verify signature and expiry, surfacing a uniform 401 on any failure.
fn decode_claims(token: &str, state: &AppState) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, state.decoding_key(), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::Unauthorized("token expired".to_string())
            }
            _ => ApiError::Unauthorized("invalid token".to_string()),
        })
}
