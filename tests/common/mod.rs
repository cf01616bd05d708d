#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use noteful_api::{config::AppConfig, AppState};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "password";

/// In-process server with its own in-memory store; one per test
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let state = AppState::in_memory(AppConfig::testing());
        tokio::spawn(async move {
            let _ = axum::serve(listener, noteful_api::app(state)).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    /// Unauthenticated POST
    pub async fn post_public(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(&body).send().await?)
    }

    /// Unauthenticated GET
    pub async fn get_public(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn register(&self, username: &str) -> Result<Value> {
        let res = self
            .post_public(
                "/api/users",
                json!({ "username": username, "password": PASSWORD, "fullname": "Test User" }),
            )
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .post_public("/api/login", json!({ "username": username, "password": password }))
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["authToken"]
            .as_str()
            .map(str::to_string)
            .context("login response missing authToken")
    }

    /// Register and log in, returning a bearer token
    pub async fn user(&self, username: &str) -> Result<String> {
        self.register(username).await?;
        self.login(username, PASSWORD).await
    }

    /// Create an entity and return its JSON body
    pub async fn create(&self, path: &str, token: &str, body: Value) -> Result<Value> {
        let res = self.post(path, token, body).await?;
        anyhow::ensure!(
            res.status() == StatusCode::CREATED,
            "create {} failed: {}",
            path,
            res.status()
        );
        Ok(res.json().await?)
    }
}

pub async fn spawn_app() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// `id` field of a JSON entity as an owned string
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap_or_default().to_string()
}

/// Extract the error message from a JSON error body
pub async fn message_of(res: Response) -> Result<String> {
    let body: Value = res.json().await?;
    Ok(body["message"].as_str().unwrap_or_default().to_string())
}

/// Parse an RFC 3339 timestamp field such as `createdAt`
pub fn timestamp(value: &Value, field: &str) -> Result<DateTime<Utc>> {
    let raw = value[field]
        .as_str()
        .with_context(|| format!("missing `{}` in {}", field, value))?;
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
