#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use uuid::Uuid;

use ngo_scholarship_api::database::{MemoryStore, Store};
use ngo_scholarship_api::{app, AppConfig, AppState};

pub const PASSWORD: &str = "Abcdef12";
pub const TEST_SECRET: &str = "integration-test-secret";

/// Router served on a loopback port, backed by a seeded `MemoryStore`.
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

/// A registered, logged-in account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    // Cheapest Argon2 cost the crate accepts
    config.security.password_memory_kib = 8;
    config.security.password_iterations = 1;
    config.assessment.reports_base_url = "https://reports.test".to_string();
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|state| state).await
}

/// Like [`spawn_server`], letting the caller swap policies on the state.
pub async fn spawn_server_with<F>(customize: F) -> Result<TestServer>
where
    F: FnOnce(AppState) -> AppState,
{
    let store = Arc::new(MemoryStore::seeded());
    let shared: Arc<dyn Store> = store.clone();
    let state = customize(AppState::new(test_config(), shared).context("failed to build state")?);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
        handle,
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<Response> {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
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

    pub async fn register(&self, name: &str, email: &str, role: &str) -> Result<Response> {
        self.post(
            "/auth/register",
            None,
            json!({ "name": name, "email": email, "password": PASSWORD, "role": role }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        self.post("/auth/login", None, json!({ "email": email, "password": password }))
            .await
    }

    /// Registers a fresh account with a unique email and logs it in.
    pub async fn account(&self, role: &str) -> Result<Account> {
        let email = format!("{}-{}@example.org", role, Uuid::new_v4().simple());
        let res = self.register("Test Account", &email, role).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let id = data(res).await?["id"]
            .as_str()
            .context("user id missing")?
            .to_string();

        let res = self.login(&email, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let token = data(res).await?["access_token"]
            .as_str()
            .context("access_token missing")?
            .to_string();

        Ok(Account { id, email, token })
    }

    /// A student account that already has a profile.
    pub async fn student_with_profile(&self) -> Result<(Account, Value)> {
        let account = self.account("student").await?;
        let res = self
            .post(
                &format!("/students/{}/profile", account.id),
                Some(&account.token),
                sample_profile(),
            )
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "profile failed: {}", res.status());
        let profile = data(res).await?;
        Ok((account, profile))
    }
}

pub fn sample_profile() -> Value {
    json!({
        "phone": "0300-1234567",
        "address": "12 Canal Road, Lahore",
        "help_text": "Support with tuition fees for intermediate studies",
        "photo_url": "https://cdn.example.org/photo.png",
        "gender": "female",
        "age": 17,
        "parent_live_status": "both",
        "is_eligible_for_zakat": true
    })
}

pub async fn body(res: Response) -> Result<Value> {
    Ok(res.json::<Value>().await?)
}

/// The `data` member of a success envelope.
pub async fn data(res: Response) -> Result<Value> {
    let body = body(res).await?;
    anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
    Ok(body["data"].clone())
}
