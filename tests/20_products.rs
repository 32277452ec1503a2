mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{expect_status, TestServer};

#[tokio::test]
async fn owner_creates_and_lists_products() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .as_user(server.post("/api/products"), "alice")
        .json(&json!({ "title": "Lamp", "description": "Desk lamp", "imageUrl": "https://img.example/l.png" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::CREATED).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Lamp");
    assert_eq!(body["data"]["imageUrl"], "https://img.example/l.png");
    assert_eq!(body["data"]["userId"], "alice");

    server.create_product("bob", "Chair").await?;

    let res = server.get("/api/products").send().await?;
    let all = expect_status(res, StatusCode::OK).await?;
    assert_eq!(all["data"].as_array().map(Vec::len), Some(2));

    let res = server.as_user(server.get("/api/products/my"), "alice").send().await?;
    let mine = expect_status(res, StatusCode::OK).await?;
    let mine = mine["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "Lamp");
    Ok(())
}

#[tokio::test]
async fn anonymous_create_is_rejected_before_body_checks() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post("/api/products")
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    let body = expect_status(res, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let res = server.get("/api/products").send().await?;
    let all = expect_status(res, StatusCode::OK).await?;
    assert_eq!(all["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_with_missing_fields_is_a_validation_error() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .as_user(server.post("/api/products"), "alice")
        .json(&json!({ "title": "Lamp", "description": "" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["description"], "This field is required");
    assert_eq!(body["field_errors"]["imageUrl"], "This field is required");
    assert!(body["field_errors"].get("title").is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_reported() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .as_user(server.post("/api/products"), "alice")
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.create_product("alice", "Lamp").await?;

    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "bob")
        .json(&json!({ "title": "Stolen" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::FORBIDDEN).await?;
    assert_eq!(body["code"], "FORBIDDEN");

    let res = server.as_user(server.delete(&format!("/api/products/{id}")), "bob").send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    let res = server.get(&format!("/api/products/{id}")).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["data"]["title"], "Lamp");
    Ok(())
}

#[tokio::test]
async fn owner_updates_only_supplied_fields() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.create_product("alice", "Lamp").await?;

    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "alice")
        .json(&json!({ "title": "Floor lamp" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["data"]["title"], "Floor lamp");
    assert_eq!(body["data"]["description"], "Lamp description");
    assert_eq!(body["data"]["userId"], "alice");

    // Empty body leaves the product as it was
    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "alice")
        .json(&json!({}))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["data"]["title"], "Floor lamp");

    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "alice")
        .json(&json!({ "title": "" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["field_errors"]["title"], "This field cannot be empty");
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    let missing = "3f2b6c1e-8a51-4a55-9d0e-6c0f0c3f5b11";

    let res = server.get(&format!("/api/products/{missing}")).send().await?;
    let body = expect_status(res, StatusCode::NOT_FOUND).await?;
    assert_eq!(body["error"], "Product not found");

    let res = server.get("/api/products/not-a-uuid").send().await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;

    let res = server
        .as_user(server.put(&format!("/api/products/{missing}")), "alice")
        .json(&json!({ "title": "x" }))
        .send()
        .await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;

    let res = server.as_user(server.delete(&format!("/api/products/{missing}")), "alice").send().await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;

    // Anonymous callers learn nothing about existence
    let res = server.delete(&format!("/api/products/{missing}")).send().await?;
    expect_status(res, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}

#[tokio::test]
async fn owner_deletes_product() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.create_product("alice", "Lamp").await?;

    let res = server.as_user(server.delete(&format!("/api/products/{id}")), "alice").send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["kind"], "product");

    let res = server.get(&format!("/api/products/{id}")).send().await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;

    let res = server.as_user(server.delete(&format!("/api/products/{id}")), "alice").send().await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;
    Ok(())
}

#[tokio::test]
async fn detail_includes_owner_profile_once_synced() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.create_product("alice", "Lamp").await?;

    let res = server.get(&format!("/api/products/{id}")).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert!(body["data"]["user"].is_null());
    assert_eq!(body["data"]["comments"], json!([]));

    let res = server
        .as_user(server.post("/api/users/sync"), "alice")
        .json(&json!({ "email": "alice@example.com", "name": "Alice", "imageUrl": "https://img.example/a.png" }))
        .send()
        .await?;
    expect_status(res, StatusCode::OK).await?;

    let res = server.get(&format!("/api/products/{id}")).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["data"]["user"]["name"], "Alice");
    Ok(())
}

#[tokio::test]
async fn update_body_errors_are_reported_only_to_the_owner() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.create_product("alice", "Lamp").await?;
    let unknown = "3f2b6c1e-8a51-4a55-9d0e-6c0f0c3f5b11";

    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "bob")
        .json(&json!({ "title": 5 }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::FORBIDDEN).await?;
    assert_eq!(body["code"], "FORBIDDEN");

    let res = server
        .as_user(server.put(&format!("/api/products/{unknown}")), "bob")
        .json(&json!({ "title": 5 }))
        .send()
        .await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;

    let res = server
        .put(&format!("/api/products/{id}"))
        .json(&json!({ "title": 5 }))
        .send()
        .await?;
    expect_status(res, StatusCode::UNAUTHORIZED).await?;

    let res = server
        .as_user(server.put(&format!("/api/products/{id}")), "alice")
        .json(&json!({ "title": 5 }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
