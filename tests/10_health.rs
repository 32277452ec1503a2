mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_memory_storage() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/health").send().await?;
    let body = common::expect_status(res, StatusCode::OK).await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_api() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/").send().await?;
    let body = common::expect_status(res, StatusCode::OK).await?;

    assert_eq!(body["data"]["name"], "Marketplace API");
    assert!(body["data"]["endpoints"]["products"].is_string());
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_treated_as_anonymous() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    // Public routes still answer
    let res = server.get("/api/products").bearer_auth("not-a-jwt").send().await?;
    common::expect_status(res, StatusCode::OK).await?;

    // Caller routes answer 401
    let res = server.get("/api/products/my").bearer_auth("not-a-jwt").send().await?;
    let body = common::expect_status(res, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}
