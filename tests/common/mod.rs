#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use marketplace_api::auth::{generate_session_token, JwtIdentityResolver};
use marketplace_api::config::AppConfig;
use marketplace_api::database::MemoryGateway;
use marketplace_api::{app, AppState};

/// A router bound to an ephemeral port, backed by a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub config: AppConfig,
    pub client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let config = AppConfig::development();
        let identity = JwtIdentityResolver::new(&config.security).context("failed to build identity resolver")?;
        let state = AppState::new(Arc::new(MemoryGateway::new()), Arc::new(identity));
        let router = app(state, &config.security);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            config,
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Session token for `user_id`, signed with the server's secret
    pub fn token(&self, user_id: &str) -> String {
        generate_session_token(&self.config.security, user_id).expect("failed to mint token")
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    pub fn as_user(&self, request: RequestBuilder, user_id: &str) -> RequestBuilder {
        request.bearer_auth(self.token(user_id))
    }

    /// POST a product as `user_id` and return its id
    pub async fn create_product(&self, user_id: &str, title: &str) -> Result<String> {
        let res = self
            .as_user(self.post("/api/products"), user_id)
            .json(&json!({
                "title": title,
                "description": format!("{title} description"),
                "imageUrl": "https://img.example/p.png",
            }))
            .send()
            .await?;
        let body = expect_status(res, StatusCode::CREATED).await?;
        Ok(body["data"]["id"].as_str().context("product id missing")?.to_string())
    }

    /// POST a comment as `user_id` on `product_id` and return its id
    pub async fn create_comment(&self, user_id: &str, product_id: &str, content: &str) -> Result<String> {
        let res = self
            .as_user(self.post(&format!("/api/comments/{product_id}")), user_id)
            .json(&json!({ "content": content }))
            .send()
            .await?;
        let body = expect_status(res, StatusCode::CREATED).await?;
        Ok(body["data"]["id"].as_str().context("comment id missing")?.to_string())
    }
}

/// Assert the status and hand back the JSON body
pub async fn expect_status(res: Response, status: StatusCode) -> Result<Value> {
    let actual = res.status();
    let body: Value = res.json().await.context("response was not JSON")?;
    anyhow::ensure!(actual == status, "expected {status}, got {actual}: {body}");
    Ok(body)
}
