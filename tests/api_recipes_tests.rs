// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe CRUD, validation and listing filter tests.

use axum::http::{Method, StatusCode};
use common::{
    create_recipe, create_test_app, create_user, ingredient_id, recipe_payload, send, tag_id,
};
use serde_json::{json, Value};

mod common;

fn names(page: &Value) -> Vec<String> {
    page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_and_get_recipe() {
    let (app, state) = create_test_app().await;
    let (author_id, token) = create_user(&state, "chef").await;
    let breakfast = tag_id(&state, "breakfast").await;
    let flour = ingredient_id(&state, "мука").await;
    let milk = ingredient_id(&state, "молоко").await;

    let response = send(
        &app,
        Method::POST,
        "/api/recipes/",
        Some(&token),
        Some(recipe_payload("Блины", &[breakfast], &[(flour, 200), (milk, 500)])),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

    let body = response.json();
    assert_eq!(body["name"], "Блины");
    assert_eq!(body["author"]["id"], author_id);
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert_eq!(body["ingredients"][0]["name"], "мука");
    assert_eq!(body["ingredients"][0]["measurement_unit"], "г");
    assert_eq!(body["ingredients"][0]["amount"], 200);
    assert_eq!(body["ingredients"][1]["amount"], 500);
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);

    let recipe_id = body["id"].as_i64().unwrap();
    let detail = send(&app, Method::GET, &format!("/api/recipes/{}/", recipe_id), None, None).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.json()["text"], "Смешать и приготовить.");

    let missing = send(&app, Method::GET, "/api/recipes/4242/", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_auth() {
    let (app, state) = create_test_app().await;
    let lunch = tag_id(&state, "lunch").await;
    let flour = ingredient_id(&state, "мука").await;

    let response = send(
        &app,
        Method::POST,
        "/api/recipes/",
        None,
        Some(recipe_payload("Суп", &[lunch], &[(flour, 10)])),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validation() {
    let (app, state) = create_test_app().await;
    let (_, token) = create_user(&state, "chef").await;
    let lunch = tag_id(&state, "lunch").await;
    let flour = ingredient_id(&state, "мука").await;

    let cases = vec![
        ("no tags", recipe_payload("Суп", &[], &[(flour, 10)])),
        ("repeated tag", recipe_payload("Суп", &[lunch, lunch], &[(flour, 10)])),
        ("unknown tag", recipe_payload("Суп", &[9999], &[(flour, 10)])),
        ("no ingredients", recipe_payload("Суп", &[lunch], &[])),
        (
            "repeated ingredient",
            recipe_payload("Суп", &[lunch], &[(flour, 10), (flour, 20)]),
        ),
        ("unknown ingredient", recipe_payload("Суп", &[lunch], &[(9999, 10)])),
        ("zero amount", recipe_payload("Суп", &[lunch], &[(flour, 0)])),
        ("huge amount", recipe_payload("Суп", &[lunch], &[(flour, 32_001)])),
    ];

    for (label, payload) in cases {
        let response = send(&app, Method::POST, "/api/recipes/", Some(&token), Some(payload)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "case: {}", label);
    }

    let mut no_image = recipe_payload("Суп", &[lunch], &[(flour, 10)]);
    no_image.as_object_mut().unwrap().remove("image");
    let response = send(&app, Method::POST, "/api/recipes/", Some(&token), Some(no_image)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut zero_time = recipe_payload("Суп", &[lunch], &[(flour, 10)]);
    zero_time["cooking_time"] = json!(0);
    let response = send(&app, Method::POST, "/api/recipes/", Some(&token), Some(zero_time)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let list = send(&app, Method::GET, "/api/recipes/", None, None).await;
    assert_eq!(list.json()["count"], 0);
}

#[tokio::test]
async fn test_update_by_author_only() {
    let (app, state) = create_test_app().await;
    let (_, author_token) = create_user(&state, "author").await;
    let (_, other_token) = create_user(&state, "other").await;
    let lunch = tag_id(&state, "lunch").await;
    let dinner = tag_id(&state, "dinner").await;
    let flour = ingredient_id(&state, "мука").await;
    let eggs = ingredient_id(&state, "яйца").await;

    let recipe_id = create_recipe(&app, &author_token, "Пирог", &[lunch], &[(flour, 300)]).await;
    let uri = format!("/api/recipes/{}/", recipe_id);

    let mut update = recipe_payload("Пирог с яйцом", &[dinner], &[(eggs, 2)]);
    update.as_object_mut().unwrap().remove("image");

    let forbidden = send(&app, Method::PATCH, &uri, Some(&other_token), Some(update.clone())).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let updated = send(&app, Method::PATCH, &uri, Some(&author_token), Some(update)).await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.text);
    let body = updated.json();
    assert_eq!(body["name"], "Пирог с яйцом");
    assert_eq!(body["tags"].as_array().unwrap().len(), 1);
    assert_eq!(body["tags"][0]["slug"], "dinner");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(body["ingredients"][0]["name"], "яйца");
    // Image kept when omitted
    assert_eq!(body["image"], "data:image/png;base64,iVBORw0KGgo=");

    let missing = send(
        &app,
        Method::PATCH,
        "/api/recipes/4242/",
        Some(&author_token),
        Some(recipe_payload("x", &[lunch], &[(flour, 1)])),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_by_author_only() {
    let (app, state) = create_test_app().await;
    let (_, author_token) = create_user(&state, "author").await;
    let (_, other_token) = create_user(&state, "other").await;
    let lunch = tag_id(&state, "lunch").await;
    let flour = ingredient_id(&state, "мука").await;

    let recipe_id = create_recipe(&app, &author_token, "Пирог", &[lunch], &[(flour, 300)]).await;
    let uri = format!("/api/recipes/{}/", recipe_id);

    let forbidden = send(&app, Method::DELETE, &uri, Some(&other_token), None).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let anonymous = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let deleted = send(&app, Method::DELETE, &uri, Some(&author_token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters() {
    let (app, state) = create_test_app().await;
    let (anna_id, anna) = create_user(&state, "anna").await;
    let (_, boris) = create_user(&state, "boris").await;
    let breakfast = tag_id(&state, "breakfast").await;
    let lunch = tag_id(&state, "lunch").await;
    let dinner = tag_id(&state, "dinner").await;
    let flour = ingredient_id(&state, "мука").await;

    let porridge = create_recipe(&app, &anna, "Каша", &[breakfast], &[(flour, 50)]).await;
    create_recipe(&app, &anna, "Суп", &[lunch], &[(flour, 10)]).await;
    let stew = create_recipe(&app, &boris, "Рагу", &[dinner, lunch], &[(flour, 20)]).await;

    let all = send(&app, Method::GET, "/api/recipes/", None, None).await.json();
    assert_eq!(all["count"], 3);
    assert_eq!(names(&all), vec!["Рагу", "Суп", "Каша"]);

    let by_author = send(
        &app,
        Method::GET,
        &format!("/api/recipes/?author={}", anna_id),
        None,
        None,
    )
    .await
    .json();
    assert_eq!(names(&by_author), vec!["Суп", "Каша"]);

    // Any of the listed tags matches; a recipe with two matching tags is listed once
    let by_tags = send(
        &app,
        Method::GET,
        "/api/recipes/?tags=breakfast&tags=lunch",
        None,
        None,
    )
    .await
    .json();
    assert_eq!(by_tags["count"], 3);

    let dinner_only = send(&app, Method::GET, "/api/recipes/?tags=dinner", None, None)
        .await
        .json();
    assert_eq!(names(&dinner_only), vec!["Рагу"]);

    send(
        &app,
        Method::POST,
        &format!("/api/recipes/{}/favorite/", porridge),
        Some(&boris),
        None,
    )
    .await;
    send(
        &app,
        Method::POST,
        &format!("/api/recipes/{}/shopping_cart/", stew),
        Some(&boris),
        None,
    )
    .await;

    let favorited = send(&app, Method::GET, "/api/recipes/?is_favorited=1", Some(&boris), None)
        .await
        .json();
    assert_eq!(names(&favorited), vec!["Каша"]);
    assert_eq!(favorited["results"][0]["is_favorited"], true);

    let in_cart = send(
        &app,
        Method::GET,
        "/api/recipes/?is_in_shopping_cart=1",
        Some(&boris),
        None,
    )
    .await
    .json();
    assert_eq!(names(&in_cart), vec!["Рагу"]);
    assert_eq!(in_cart["results"][0]["is_in_shopping_cart"], true);

    // Viewer filters are ignored for anonymous requests
    let anonymous = send(&app, Method::GET, "/api/recipes/?is_favorited=1", None, None)
        .await
        .json();
    assert_eq!(anonymous["count"], 3);

    // Other users' lists do not leak
    let anna_favorites = send(&app, Method::GET, "/api/recipes/?is_favorited=1", Some(&anna), None)
        .await
        .json();
    assert_eq!(anna_favorites["count"], 0);
}

#[tokio::test]
async fn test_list_pagination_keeps_filters() {
    let (app, state) = create_test_app().await;
    let (_, token) = create_user(&state, "chef").await;
    let lunch = tag_id(&state, "lunch").await;
    let flour = ingredient_id(&state, "мука").await;

    for i in 0..8 {
        create_recipe(&app, &token, &format!("Рецепт {}", i), &[lunch], &[(flour, 1)]).await;
    }

    let first = send(&app, Method::GET, "/api/recipes/?tags=lunch", None, None)
        .await
        .json();
    assert_eq!(first["count"], 8);
    assert_eq!(first["results"].as_array().unwrap().len(), 6);
    assert_eq!(
        first["next"],
        "http://testserver/api/recipes/?tags=lunch&page=2"
    );

    let second = send(&app, Method::GET, "/api/recipes/?tags=lunch&page=2", None, None)
        .await
        .json();
    assert_eq!(second["results"].as_array().unwrap().len(), 2);
    assert_eq!(second["next"], Value::Null);
}

#[tokio::test]
async fn test_malformed_query_is_json_validation_error() {
    let (app, _) = create_test_app().await;

    for uri in ["/api/recipes/?page=abc", "/api/recipes/?author=x", "/api/recipes/?limit=-1"] {
        let response = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response.json()["error"], "validation_error", "{}", uri);
    }
}
