mod common;

use anyhow::Result;
use reqwest::{header::LOCATION, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_public_fields_only() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .post_public(
            "/api/users",
            json!({ "username": "bobuser", "password": "password", "fullname": "  Bob User  " }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()[LOCATION].to_str()?.to_string();

    let body: Value = res.json().await?;
    assert_eq!(location, format!("/api/users/{}", common::id_of(&body)));
    assert_eq!(body["username"], "bobuser");
    assert_eq!(body["fullname"], "Bob User");

    let keys: Vec<&String> = body.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    assert_eq!(keys.len(), 3, "unexpected fields: {:?}", keys);
    assert!(body.get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_username() -> Result<()> {
    let server = common::spawn_app().await?;
    server.register("bobuser").await?;

    let res = server
        .post_public("/api/users", json!({ "username": "bobuser", "password": "password" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::message_of(res).await?, "The username already exists");
    Ok(())
}

#[tokio::test]
async fn register_validates_fields() -> Result<()> {
    let server = common::spawn_app().await?;

    let cases = [
        (json!({ "password": "password" }), "Missing `username` in request body"),
        (json!({ "username": "bobuser" }), "Missing `password` in request body"),
        (json!({ "username": 42, "password": "password" }), "Field `username` is not a string"),
        (
            json!({ "username": " bobuser", "password": "password" }),
            "Leading or trailing whitespace in `username`",
        ),
        (
            json!({ "username": "bobuser", "password": "1234567" }),
            "`password` must be between 8 and 72 characters",
        ),
        (
            json!({ "username": "bobuser", "password": "x".repeat(73) }),
            "`password` must be between 8 and 72 characters",
        ),
    ];

    for (body, expected) in cases {
        let res = server.post_public("/api/users", body.clone()).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(common::message_of(res).await?, expected, "{}", body);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let server = common::spawn_app().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
