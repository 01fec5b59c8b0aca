// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware and extractors.
//!
//! Every request passes through [`authenticate`]. A request carrying a valid
//! token gets an [`AuthUser`] extension and one without a token continues
//! anonymously. A bad `Authorization` header is rejected, while a bad session
//! cookie is ignored so the browser can still log in again or log out.
//! Handlers then ask for [`AuthUser`] (login required) or [`Viewer`] (login
//! optional).

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "foodgram_token";

/// Session lifetime.
pub const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// The requesting user, if logged in.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<AuthUser>);

impl Viewer {
    pub fn user_id(&self) -> Option<i64> {
        self.0.map(|u| u.user_id)
    }
}

/// Session token from the cookie, if set and non-empty.
pub fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Token from the `Authorization` header with either the `Bearer` or
/// `Token` scheme.
pub fn header_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(|t| t.trim().to_string())
}

/// Validate a token and return the user id it was issued for.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<i64, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT rejected");
        AppError::InvalidToken
    })?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::InvalidToken)
}

/// Resolve a token to a live account.
async fn resolve_user(state: &AppState, token: &str) -> Result<i64, AppError> {
    let user_id = verify_jwt(token, &state.config.jwt_signing_key)?;

    // Tokens outlive deleted accounts.
    if state.db.get_user(user_id).await?.is_none() {
        tracing::warn!(user_id, "Token for unknown user");
        return Err(AppError::InvalidToken);
    }
    Ok(user_id)
}

/// Middleware that attaches the authenticated user when a token is present.
///
/// An explicit `Authorization` header wins over the cookie and must be valid.
/// A cookie that no longer verifies leaves the request anonymous.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = if let Some(token) = header_token(request.headers()) {
        Some(resolve_user(&state, &token).await?)
    } else if let Some(token) = cookie_token(&jar) {
        match resolve_user(&state, &token).await {
            Ok(user_id) => Some(user_id),
            Err(AppError::InvalidToken) => {
                tracing::debug!("Ignoring stale session cookie");
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    if let Some(user_id) = user_id {
        request.extensions_mut().insert(AuthUser { user_id });
    }

    Ok(next.run(request).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<AuthUser>().copied()))
    }
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + TOKEN_TTL_SECS) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
