// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short link redirects.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/s/{code}", get(follow_short_link))
        .route("/s/{code}/", get(follow_short_link))
}

/// Redirect a short code to the recipe page it was issued for.
async fn follow_short_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let link = state
        .db
        .short_link_by_code(&code.to_ascii_lowercase())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Short link {} not found", code)))?;

    tracing::debug!(code = %link.short_code, recipe_id = link.recipe_id, "Short link followed");

    Ok((StatusCode::FOUND, [(header::LOCATION, link.full_url)]))
}
