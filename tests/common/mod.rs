#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use docman_api::auth::hash_password;
use docman_api::config::{AppConfig, StorageBackend};
use docman_api::database::models::{NewDocument, NewUser};
use docman_api::database::{MemoryStore, Store};
use docman_api::services::bootstrap;
use docman_api::types::{AccessLevel, REGULAR_ROLE};
use docman_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const GHOST_EMAIL: &str = "ghost@ghost.com";
pub const PASSWORD: &str = "password";

/// Server on its own port with a fresh memory store.
///
/// Seeded like a clean install plus fixtures: roles `admin` (1) and
/// `regular` (2), users admin (1) and ghost (2), and one public document
/// each: `admindocument` (1) and `userdocument` (2).
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let mut config = AppConfig::development();
        config.database.storage = StorageBackend::Memory;
        config.security.bcrypt_cost = 4;
        config.security.admin_email = Some(ADMIN_EMAIL.to_string());
        config.security.admin_password = Some(PASSWORD.to_string());

        let store = Arc::new(MemoryStore::new());
        bootstrap::seed(store.as_ref(), &config.security).await?;
        seed_fixtures(store.as_ref()).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let state = AppState::new(store.clone(), config);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_EMAIL, PASSWORD).await
    }

    pub async fn ghost_token(&self) -> Result<String> {
        self.login(GHOST_EMAIL, PASSWORD).await
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).header("Authorization", format!("Bearer {}", token))
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.post(self.url(path)).header("Authorization", format!("Bearer {}", token))
    }

    pub fn put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.put(self.url(path)).header("Authorization", format!("Bearer {}", token))
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).header("Authorization", format!("Bearer {}", token))
    }

    /// Add a regular user straight into the store and return their id
    pub async fn add_user(&self, email: &str) -> Result<i32> {
        let role = self
            .store
            .find_role_by_title(REGULAR_ROLE)
            .await?
            .context("regular role missing")?;
        let user = self
            .store
            .create_user(NewUser {
                first_name: "test".to_string(),
                last_name: "user".to_string(),
                email: email.to_string(),
                password: hash_password(PASSWORD, 4).await?,
                role_id: role.id,
            })
            .await?;
        Ok(user.id)
    }

    pub async fn add_document(&self, owner: i32, title: &str, access: AccessLevel) -> Result<i32> {
        let document = self
            .store
            .create_document(NewDocument {
                title: title.to_string(),
                content: format!("{} content", title),
                access,
                user_id: owner,
            })
            .await?;
        Ok(document.id)
    }
}

async fn seed_fixtures(store: &MemoryStore) -> Result<()> {
    let regular = store
        .find_role_by_title(REGULAR_ROLE)
        .await?
        .context("regular role missing")?;
    let admin = store
        .find_user_by_email(ADMIN_EMAIL)
        .await?
        .context("admin user missing")?;

    let ghost = store
        .create_user(NewUser {
            first_name: "ghost".to_string(),
            last_name: "ghost".to_string(),
            email: GHOST_EMAIL.to_string(),
            password: hash_password(PASSWORD, 4).await?,
            role_id: regular.id,
        })
        .await?;

    for (title, owner) in [("admindocument", admin.id), ("userdocument", ghost.id)] {
        store
            .create_document(NewDocument {
                title: title.to_string(),
                content: "this is a document".to_string(),
                access: AccessLevel::Public,
                user_id: owner,
            })
            .await?;
    }
    Ok(())
}

/// Titles in a `{documents: [...]}` body, in order
pub fn titles(body: &Value) -> Vec<String> {
    body["documents"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .filter_map(|d| d["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
