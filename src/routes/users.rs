// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User accounts, avatars and subscriptions.

use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, Viewer};
use crate::models::user::{AvatarRequest, RegisterRequest, SetPasswordRequest};
use crate::models::{NewUser, User};
use crate::pagination::{Page, PageRequest};
use crate::routes::recipes::RecipeShortResponse;
use crate::services::{hash_password_blocking, verify_password_blocking};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/", get(list_users).post(register))
        .route("/api/users/me/", get(get_me))
        .route("/api/users/me/avatar/", put(set_avatar).delete(delete_avatar))
        .route("/api/users/set_password/", post(set_password))
        .route("/api/users/subscriptions/", get(list_subscriptions))
        .route("/api/users/{id}/", get(get_user))
        .route("/api/users/{id}/subscribe/", post(subscribe).delete(unsubscribe))
}

// ─── Responses ───────────────────────────────────────────────

/// Public view of a user.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requesting user follows this one
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}

/// A followed author together with a preview of their recipes.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShortResponse>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub recipes_count: u64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

/// Build the public view of `user` as seen by `viewer`.
pub async fn user_view(state: &AppState, viewer: Option<i64>, user: User) -> Result<UserResponse> {
    let is_subscribed = match viewer {
        Some(viewer_id) if viewer_id != user.id => state.db.is_following(viewer_id, user.id).await?,
        _ => false,
    };
    Ok(UserResponse::new(user, is_subscribed))
}

async fn subscription_view(
    state: &AppState,
    viewer_id: i64,
    author: User,
    recipes_limit: Option<u32>,
) -> Result<SubscriptionResponse> {
    let recipes = state
        .db
        .recipes_by_author(author.id, recipes_limit)
        .await?
        .into_iter()
        .map(RecipeShortResponse::from)
        .collect();
    let recipes_count = state.db.count_recipes_by_author(author.id).await?;
    let user = user_view(state, Some(viewer_id), author).await?;

    Ok(SubscriptionResponse {
        user,
        recipes,
        recipes_count,
    })
}

async fn load_user(state: &AppState, user_id: i64) -> Result<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

// ─── Accounts ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    uri: Uri,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<UserResponse>>> {
    let Query(params) = query?;
    let request = PageRequest::new(params.page, params.limit, state.config.page_size)?;

    let users = state.db.list_users(request.limit, request.offset()).await?;
    let count = state.db.count_users().await?;

    let mut results = Vec::with_capacity(users.len());
    for user in users {
        results.push(user_view(&state, viewer.user_id(), user).await?);
    }

    Ok(Json(Page::new(
        results,
        count,
        request,
        &state.config.public_url,
        &uri,
    )))
}

/// Register a new account.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let password_hash =
        hash_password_blocking(req.password, state.config.password_iterations).await?;

    let user = state
        .db
        .create_user(&NewUser {
            email: req.email.trim().to_string(),
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::new(user, false))))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user_view(&state, viewer.user_id(), user).await?))
}

/// Get current user profile.
async fn get_me(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<UserResponse>> {
    let profile = load_user(&state, user.user_id).await?;
    Ok(Json(UserResponse::new(profile, false)))
}

async fn set_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: std::result::Result<Json<SetPasswordRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(req) = payload?;
    req.validate()?;

    let profile = load_user(&state, user.user_id).await?;
    if !verify_password_blocking(req.current_password, profile.password_hash).await? {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash =
        hash_password_blocking(req.new_password, state.config.password_iterations).await?;
    state.db.set_password_hash(user.user_id, &password_hash).await?;

    tracing::info!(user_id = user.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Avatar ──────────────────────────────────────────────────

async fn set_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: std::result::Result<Json<AvatarRequest>, JsonRejection>,
) -> Result<Json<AvatarResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    state.db.set_avatar(user.user_id, Some(&req.avatar)).await?;
    Ok(Json(AvatarResponse {
        avatar: Some(req.avatar),
    }))
}

async fn delete_avatar(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<StatusCode> {
    state.db.set_avatar(user.user_id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Subscriptions ───────────────────────────────────────────

#[derive(Deserialize)]
struct SubscriptionsQuery {
    page: Option<u32>,
    limit: Option<u32>,
    /// Maximum number of recipes shown per author
    recipes_limit: Option<u32>,
}

#[derive(Deserialize)]
struct SubscribeQuery {
    recipes_limit: Option<u32>,
}

/// Authors the current user follows.
async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    uri: Uri,
    query: std::result::Result<Query<SubscriptionsQuery>, QueryRejection>,
) -> Result<Json<Page<SubscriptionResponse>>> {
    let Query(params) = query?;
    let request = PageRequest::new(params.page, params.limit, state.config.page_size)?;

    let authors = state
        .db
        .followed_authors(user.user_id, request.limit, request.offset())
        .await?;
    let count = state.db.count_followed_authors(user.user_id).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
        results.push(subscription_view(&state, user.user_id, author, params.recipes_limit).await?);
    }

    Ok(Json(Page::new(
        results,
        count,
        request,
        &state.config.public_url,
        &uri,
    )))
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(author_id): Path<i64>,
    query: std::result::Result<Query<SubscribeQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>)> {
    let Query(params) = query?;
    let author = load_user(&state, author_id).await?;
    state.db.add_follow(user.user_id, author_id).await?;

    tracing::info!(user_id = user.user_id, author_id, "Subscribed");

    let view = subscription_view(&state, user.user_id, author, params.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(author_id): Path<i64>,
) -> Result<StatusCode> {
    load_user(&state, author_id).await?;

    if !state.db.remove_follow(user.user_id, author_id).await? {
        return Err(AppError::BadRequest(
            "You are not subscribed to this author".to_string(),
        ));
    }

    tracing::info!(user_id = user.user_id, author_id, "Unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}
