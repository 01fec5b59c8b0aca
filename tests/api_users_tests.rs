// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account, avatar and subscription endpoint tests.

use axum::http::{Method, StatusCode};
use common::{create_recipe, create_test_app, create_user, ingredient_id, send, tag_id, TEST_PASSWORD};
use serde_json::json;

mod common;

fn registration(username: &str, email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "username": username,
        "first_name": "Иван",
        "last_name": "Петров",
        "password": "Another-s3cret",
    })
}

#[tokio::test]
async fn test_register_and_login() {
    let (app, _) = create_test_app().await;

    let response = send(
        &app,
        Method::POST,
        "/api/users/",
        None,
        Some(registration("ivan", "ivan@example.com")),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

    let body = response.json();
    assert_eq!(body["username"], "ivan");
    assert_eq!(body["is_subscribed"], false);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let login = send(
        &app,
        Method::POST,
        "/api/auth/token/login/",
        None,
        Some(json!({"email": "ivan@example.com", "password": "Another-s3cret"})),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_reserved_names() {
    let (app, state) = create_test_app().await;
    create_user(&state, "taken").await;

    let duplicate_email = send(
        &app,
        Method::POST,
        "/api/users/",
        None,
        Some(registration("fresh", "TAKEN@example.com")),
    )
    .await;
    assert_eq!(duplicate_email.status, StatusCode::BAD_REQUEST);

    let duplicate_username = send(
        &app,
        Method::POST,
        "/api/users/",
        None,
        Some(registration("taken", "other@example.com")),
    )
    .await;
    assert_eq!(duplicate_username.status, StatusCode::BAD_REQUEST);

    let reserved = send(
        &app,
        Method::POST,
        "/api/users/",
        None,
        Some(registration("me", "me@example.com")),
    )
    .await;
    assert_eq!(reserved.status, StatusCode::BAD_REQUEST);
    assert_eq!(reserved.json()["error"], "validation_error");

    let missing_field = send(
        &app,
        Method::POST,
        "/api/users/",
        None,
        Some(json!({"email": "x@example.com"})),
    )
    .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users_paginates() {
    let (app, state) = create_test_app().await;
    for name in ["anna", "boris", "vera"] {
        create_user(&state, name).await;
    }

    let first = send(&app, Method::GET, "/api/users/?limit=2", None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    let body = first.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["username"], "anna");
    assert_eq!(body["previous"], serde_json::Value::Null);
    assert_eq!(body["next"], "http://testserver/api/users/?limit=2&page=2");

    let second = send(&app, Method::GET, "/api/users/?limit=2&page=2", None, None).await;
    let body = second.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["next"], serde_json::Value::Null);
    assert_eq!(body["previous"], "http://testserver/api/users/?limit=2&page=1");

    let bad_page = send(&app, Method::GET, "/api/users/?page=0", None, None).await;
    assert_eq!(bad_page.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user() {
    let (app, state) = create_test_app().await;
    let (user_id, _) = create_user(&state, "anna").await;

    let found = send(&app, Method::GET, &format!("/api/users/{}/", user_id), None, None).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json()["email"], "anna@example.com");

    let missing = send(&app, Method::GET, "/api/users/4242/", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_password() {
    let (app, state) = create_test_app().await;
    let (_, token) = create_user(&state, "anna").await;

    let wrong = send(
        &app,
        Method::POST,
        "/api/users/set_password/",
        Some(&token),
        Some(json!({"current_password": "wrong", "new_password": "N3w-password"})),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);

    let changed = send(
        &app,
        Method::POST,
        "/api/users/set_password/",
        Some(&token),
        Some(json!({"current_password": TEST_PASSWORD, "new_password": "N3w-password"})),
    )
    .await;
    assert_eq!(changed.status, StatusCode::NO_CONTENT);

    let old_login = send(
        &app,
        Method::POST,
        "/api/auth/token/login/",
        None,
        Some(json!({"email": "anna@example.com", "password": TEST_PASSWORD})),
    )
    .await;
    assert_eq!(old_login.status, StatusCode::BAD_REQUEST);

    let new_login = send(
        &app,
        Method::POST,
        "/api/auth/token/login/",
        None,
        Some(json!({"email": "anna@example.com", "password": "N3w-password"})),
    )
    .await;
    assert_eq!(new_login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_avatar_set_and_clear() {
    let (app, state) = create_test_app().await;
    let (_, token) = create_user(&state, "anna").await;
    let avatar = "data:image/png;base64,iVBORw0KGgo=";

    let set = send(
        &app,
        Method::PUT,
        "/api/users/me/avatar/",
        Some(&token),
        Some(json!({"avatar": avatar})),
    )
    .await;
    assert_eq!(set.status, StatusCode::OK);
    assert_eq!(set.json()["avatar"], avatar);

    let me = send(&app, Method::GET, "/api/users/me/", Some(&token), None).await;
    assert_eq!(me.json()["avatar"], avatar);

    let empty = send(
        &app,
        Method::PUT,
        "/api/users/me/avatar/",
        Some(&token),
        Some(json!({"avatar": ""})),
    )
    .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let cleared = send(&app, Method::DELETE, "/api/users/me/avatar/", Some(&token), None).await;
    assert_eq!(cleared.status, StatusCode::NO_CONTENT);

    let me = send(&app, Method::GET, "/api/users/me/", Some(&token), None).await;
    assert_eq!(me.json()["avatar"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_subscribe_lifecycle() {
    let (app, state) = create_test_app().await;
    let (author_id, author_token) = create_user(&state, "author").await;
    let (reader_id, reader_token) = create_user(&state, "reader").await;

    let lunch = tag_id(&state, "lunch").await;
    let flour = ingredient_id(&state, "мука").await;
    for name in ["Блины", "Оладьи", "Сырники"] {
        create_recipe(&app, &author_token, name, &[lunch], &[(flour, 100)]).await;
    }

    let subscribe_uri = format!("/api/users/{}/subscribe/?recipes_limit=2", author_id);
    let subscribed = send(&app, Method::POST, &subscribe_uri, Some(&reader_token), None).await;
    assert_eq!(subscribed.status, StatusCode::CREATED, "{}", subscribed.text);
    let body = subscribed.json();
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
    // Newest first
    assert_eq!(body["recipes"][0]["name"], "Сырники");

    let again = send(&app, Method::POST, &subscribe_uri, Some(&reader_token), None).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);

    let own = send(
        &app,
        Method::POST,
        &format!("/api/users/{}/subscribe/", reader_id),
        Some(&reader_token),
        None,
    )
    .await;
    assert_eq!(own.status, StatusCode::BAD_REQUEST);

    let unknown = send(&app, Method::POST, "/api/users/4242/subscribe/", Some(&reader_token), None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let list = send(
        &app,
        Method::GET,
        "/api/users/subscriptions/?recipes_limit=1",
        Some(&reader_token),
        None,
    )
    .await;
    assert_eq!(list.status, StatusCode::OK);
    let body = list.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "author");
    assert_eq!(body["results"][0]["recipes"].as_array().unwrap().len(), 1);

    // Viewer-relative flag on the public profile
    let profile = send(
        &app,
        Method::GET,
        &format!("/api/users/{}/", author_id),
        Some(&reader_token),
        None,
    )
    .await;
    assert_eq!(profile.json()["is_subscribed"], true);

    let unsubscribe_uri = format!("/api/users/{}/subscribe/", author_id);
    let removed = send(&app, Method::DELETE, &unsubscribe_uri, Some(&reader_token), None).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let removed_again = send(&app, Method::DELETE, &unsubscribe_uri, Some(&reader_token), None).await;
    assert_eq!(removed_again.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscriptions_require_auth() {
    let (app, _) = create_test_app().await;

    let response = send(&app, Method::GET, "/api/users/subscriptions/", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_query_is_json_validation_error() {
    let (app, state) = create_test_app().await;
    let (_, token) = create_user(&state, "reader").await;

    let users = send(&app, Method::GET, "/api/users/?page=abc", None, None).await;
    assert_eq!(users.status, StatusCode::BAD_REQUEST);
    assert_eq!(users.json()["error"], "validation_error");

    let subscriptions = send(
        &app,
        Method::GET,
        "/api/users/subscriptions/?recipes_limit=many",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(subscriptions.status, StatusCode::BAD_REQUEST);
    assert_eq!(subscriptions.json()["error"], "validation_error");
}
