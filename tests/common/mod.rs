// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use foodgram::config::Config;
use foodgram::db::Database;
use foodgram::middleware::auth::create_jwt;
use foodgram::models::{NewIngredient, NewTag, NewUser};
use foodgram::routes::create_router;
use foodgram::services::hash_password;
use foodgram::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Password given to every user made by [`create_user`].
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "Sup3r-secret";

/// Create a test app backed by a fresh in-memory database with a small
/// tag and ingredient catalog.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to open in-memory database");

    db.insert_tags(&[
        new_tag("Завтрак", "breakfast"),
        new_tag("Обед", "lunch"),
        new_tag("Ужин", "dinner"),
    ])
    .await
    .unwrap();
    db.insert_ingredients(&[
        new_ingredient("мука", "г"),
        new_ingredient("молоко", "мл"),
        new_ingredient("яйца", "шт"),
        new_ingredient("сахар", "г"),
    ])
    .await
    .unwrap();

    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

fn new_tag(name: &str, slug: &str) -> NewTag {
    NewTag {
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn new_ingredient(name: &str, unit: &str) -> NewIngredient {
    NewIngredient {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
    }
}

/// Insert a user directly and return its id and a session token.
#[allow(dead_code)]
pub async fn create_user(state: &AppState, username: &str) -> (i64, String) {
    let user = state
        .db
        .create_user(&NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: hash_password(TEST_PASSWORD, state.config.password_iterations)
                .unwrap(),
        })
        .await
        .unwrap();

    let token = create_jwt(user.id, &state.config.jwt_signing_key).unwrap();
    (user.id, token)
}

/// Look up a seeded tag id by slug.
#[allow(dead_code)]
pub async fn tag_id(state: &AppState, slug: &str) -> i64 {
    state
        .db
        .list_tags()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.slug == slug)
        .map(|t| t.id)
        .unwrap_or_else(|| panic!("no tag {}", slug))
}

/// Look up a seeded ingredient id by name.
#[allow(dead_code)]
pub async fn ingredient_id(state: &AppState, name: &str) -> i64 {
    state
        .db
        .list_ingredients(Some(name))
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.name == name)
        .map(|i| i.id)
        .unwrap_or_else(|| panic!("no ingredient {}", name))
}

/// Response captured by [`send`].
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, self.text))
    }
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Recipe payload with the given tags and `(ingredient id, amount)` rows.
#[allow(dead_code)]
pub fn recipe_payload(name: &str, tags: &[i64], ingredients: &[(i64, i32)]) -> Value {
    json!({
        "name": name,
        "text": "Смешать и приготовить.",
        "image": "data:image/png;base64,iVBORw0KGgo=",
        "cooking_time": 15,
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
    })
}

/// Create a recipe through the API and return its id.
#[allow(dead_code)]
pub async fn create_recipe(
    app: &Router,
    token: &str,
    name: &str,
    tags: &[i64],
    ingredients: &[(i64, i32)],
) -> i64 {
    let response = send(
        app,
        Method::POST,
        "/api/recipes/",
        Some(token),
        Some(recipe_payload(name, tags, ingredients)),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["id"].as_i64().unwrap()
}
