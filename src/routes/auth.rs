// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token login and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{cookie_token, create_jwt, AUTH_COOKIE, TOKEN_TTL_SECS};
use crate::middleware::Viewer;
use crate::services::verify_password_blocking;
use crate::AppState;

const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/token/login/", post(login))
        .route("/api/auth/token/logout/", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// Exchange email and password for a session token.
///
/// The token is returned in the body and also set as an HTTP-only cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    let Json(req) = payload?;

    let Some(user) = state.db.get_user_by_email(&req.email).await? else {
        tracing::info!("Login attempt for unknown email");
        return Err(AppError::BadRequest(BAD_CREDENTIALS.to_string()));
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        tracing::info!(user_id = user.id, "Login attempt with wrong password");
        return Err(AppError::BadRequest(BAD_CREDENTIALS.to_string()));
    }

    let token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(user_id = user.id, "User logged in");

    let cookie = Cookie::build((AUTH_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.public_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS as i64));

    Ok((jar.add(cookie), Json(TokenResponse { auth_token: token })))
}

/// Clear the session cookie. Tokens are stateless, so a copy held by the
/// client stays valid until it expires.
///
/// A request with a session cookie is always answered with the removal, even
/// when that cookie no longer verifies. Without a cookie a valid token is
/// required.
async fn logout(viewer: Viewer, jar: CookieJar) -> Result<(StatusCode, CookieJar)> {
    let has_cookie = cookie_token(&jar).is_some();
    match viewer.user_id() {
        Some(user_id) => tracing::info!(user_id, "User logged out"),
        None if has_cookie => tracing::info!("Stale session cookie cleared"),
        None => return Err(AppError::Unauthorized),
    }

    // Always send the removal, even when the token came in a header.
    let mut cookie = Cookie::build((AUTH_COOKIE, "")).path("/").http_only(true).build();
    cookie.make_removal();
    Ok((StatusCode::NO_CONTENT, jar.add(cookie)))
}
