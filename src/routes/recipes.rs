// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe routes: CRUD, favorites, shopping cart and short links.

use crate::db::RecipeList;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, Viewer};
use crate::models::{Recipe, RecipeDraft, RecipeFilter, RecipeIngredientAmount, RecipePayload, Tag};
use crate::pagination::{Page, PageRequest};
use crate::routes::users::{user_view, UserResponse};
use crate::services::shopping_list::{self, SHOPPING_LIST_FILENAME};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route("/api/recipes/{id}/get-link/", get(get_link))
        .route(
            "/api/recipes/{id}/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
}

// ─── Responses ───────────────────────────────────────────────

/// Full recipe as returned by detail, list and write endpoints.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecipeResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Compact recipe used in subscriptions, favorites and the cart.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecipeShortResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeShortResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

async fn recipe_view(state: &AppState, viewer: Option<i64>, recipe: Recipe) -> Result<RecipeResponse> {
    let author = state.db.get_user(recipe.author_id).await?.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Author {} of recipe {} is missing",
            recipe.author_id,
            recipe.id
        ))
    })?;
    let author = user_view(state, viewer, author).await?;
    let tags = state.db.recipe_tags(recipe.id).await?;
    let ingredients = state.db.recipe_ingredients(recipe.id).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(user_id) => (
            state
                .db
                .list_contains(RecipeList::Favorites, user_id, recipe.id)
                .await?,
            state
                .db
                .list_contains(RecipeList::ShoppingCart, user_id, recipe.id)
                .await?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    })
}

async fn load_recipe(state: &AppState, recipe_id: i64) -> Result<Recipe> {
    state
        .db
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", recipe_id)))
}

/// Load a recipe the user is allowed to modify.
async fn load_own_recipe(state: &AppState, user: AuthUser, recipe_id: i64) -> Result<Recipe> {
    let recipe = load_recipe(state, recipe_id).await?;
    if recipe.author_id != user.user_id {
        tracing::warn!(
            user_id = user.user_id,
            recipe_id,
            author_id = recipe.author_id,
            "Attempt to modify another user's recipe"
        );
        return Err(AppError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }
    Ok(recipe)
}

/// Validate a write payload, including that every referenced tag and
/// ingredient exists.
async fn validated_draft(state: &AppState, payload: RecipePayload) -> Result<RecipeDraft> {
    payload.validate()?;

    let known_tags = state.db.existing_tag_ids(&payload.tags).await?;
    let mut missing_tags: Vec<i64> = payload
        .tags
        .iter()
        .copied()
        .filter(|id| !known_tags.contains(id))
        .collect();
    if !missing_tags.is_empty() {
        missing_tags.sort_unstable();
        return Err(AppError::Validation(format!(
            "tags: unknown tag ids {:?}",
            missing_tags
        )));
    }

    let ingredient_ids: Vec<i64> = payload.ingredients.iter().map(|i| i.id).collect();
    let known_ingredients = state.db.existing_ingredient_ids(&ingredient_ids).await?;
    let mut missing_ingredients: Vec<i64> = ingredient_ids
        .into_iter()
        .filter(|id| !known_ingredients.contains(id))
        .collect();
    if !missing_ingredients.is_empty() {
        missing_ingredients.sort_unstable();
        return Err(AppError::Validation(format!(
            "ingredients: unknown ingredient ids {:?}",
            missing_ingredients
        )));
    }

    Ok(RecipeDraft::from(payload))
}

// ─── CRUD ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecipeListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    author: Option<i64>,
    /// Tag slugs; repeated keys match any of them
    #[serde(default)]
    tags: Vec<String>,
    is_favorited: Option<String>,
    is_in_shopping_cart: Option<String>,
}

fn flag_set(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

async fn list_recipes(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    uri: Uri,
    query: std::result::Result<Query<RecipeListQuery>, QueryRejection>,
) -> Result<Json<Page<RecipeResponse>>> {
    let Query(params) = query?;
    let request = PageRequest::new(params.page, params.limit, state.config.page_size)?;

    // Viewer-relative filters are ignored for anonymous requests.
    let viewer_id = viewer.user_id();
    let filter = RecipeFilter {
        author_id: params.author,
        tag_slugs: params.tags,
        favorited_by: viewer_id.filter(|_| flag_set(params.is_favorited.as_deref())),
        in_cart_of: viewer_id.filter(|_| flag_set(params.is_in_shopping_cart.as_deref())),
    };

    tracing::debug!(?filter, page = request.page, "Listing recipes");

    let recipes = state
        .db
        .list_recipes(&filter, request.limit, request.offset())
        .await?;
    let count = state.db.count_recipes(&filter).await?;

    let mut results = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        results.push(recipe_view(&state, viewer_id, recipe).await?);
    }

    Ok(Json(Page::new(
        results,
        count,
        request,
        &state.config.public_url,
        &uri,
    )))
}

async fn create_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: std::result::Result<Json<RecipePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeResponse>)> {
    let Json(payload) = payload?;
    let draft = validated_draft(&state, payload).await?;
    if draft.image.is_none() {
        return Err(AppError::Validation("image: this field is required".to_string()));
    }

    let recipe_id = state.db.create_recipe(user.user_id, &draft).await?;
    let recipe = load_recipe(&state, recipe_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(recipe_view(&state, Some(user.user_id), recipe).await?),
    ))
}

async fn get_recipe(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeResponse>> {
    let recipe = load_recipe(&state, recipe_id).await?;
    Ok(Json(recipe_view(&state, viewer.user_id(), recipe).await?))
}

async fn update_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
    payload: std::result::Result<Json<RecipePayload>, JsonRejection>,
) -> Result<Json<RecipeResponse>> {
    load_own_recipe(&state, user, recipe_id).await?;

    let Json(payload) = payload?;
    let draft = validated_draft(&state, payload).await?;
    state.db.update_recipe(recipe_id, &draft).await?;

    let recipe = load_recipe(&state, recipe_id).await?;
    Ok(Json(recipe_view(&state, Some(user.user_id), recipe).await?))
}

async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    load_own_recipe(&state, user, recipe_id).await?;
    state.db.delete_recipe(recipe_id).await?;

    tracing::info!(user_id = user.user_id, recipe_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Short link ──────────────────────────────────────────────

async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<ShortLinkResponse>> {
    load_recipe(&state, recipe_id).await?;
    let link = state.short_links.get_or_create(&state.db, recipe_id).await?;

    Ok(Json(ShortLinkResponse {
        short_link: state.short_links.short_url(&link.short_code),
    }))
}

// ─── Favorites / Shopping cart ───────────────────────────────

async fn add_to_list(
    state: &AppState,
    list: RecipeList,
    user: AuthUser,
    recipe_id: i64,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    let recipe = load_recipe(state, recipe_id).await?;
    state.db.add_to_list(list, user.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::from(recipe))))
}

async fn remove_from_list(
    state: &AppState,
    list: RecipeList,
    user: AuthUser,
    recipe_id: i64,
) -> Result<StatusCode> {
    load_recipe(state, recipe_id).await?;
    if !state.db.remove_from_list(list, user.user_id, recipe_id).await? {
        return Err(AppError::BadRequest(format!(
            "Recipe is not in {}",
            list.label()
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    add_to_list(&state, RecipeList::Favorites, user, recipe_id).await
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    remove_from_list(&state, RecipeList::Favorites, user, recipe_id).await
}

async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    add_to_list(&state, RecipeList::ShoppingCart, user, recipe_id).await
}

async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    remove_from_list(&state, RecipeList::ShoppingCart, user, recipe_id).await
}

/// Download the aggregated shopping list as a text file.
async fn download_shopping_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let items = state.db.shopping_list(user.user_id).await?;
    tracing::info!(user_id = user.user_id, items = items.len(), "Shopping list downloaded");

    let body = shopping_list::render(&items);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
            ),
        ],
        body,
    ))
}
