//! HTTP client for the document API plus the action creators built on it.

pub mod actions;

use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::api::{DocumentList, DocumentMessage, Message};
use crate::database::models::Document;

pub use actions::{Dispatch, DocumentAction};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Fields sent on document create and update; unset fields are left out of the body
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

/// Token and user returned by login
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Value,
}

/// Thin wrapper over `reqwest::Client` that remembers the base URL and token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Log in and keep the issued token for later calls
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session: Session = self.send(self.request(Method::POST, "/api/users/login").json(&body)).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    pub async fn logout(&mut self) -> Result<Message, ClientError> {
        let message = self.send(self.request(Method::GET, "/api/users/logout")).await?;
        self.token = None;
        Ok(message)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "/health")).await
    }

    pub async fn user_documents(&self, user_id: i32) -> Result<DocumentList, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/users/{}/documents", user_id))).await
    }

    pub async fn public_documents(&self) -> Result<DocumentList, ClientError> {
        self.send(self.request(Method::GET, "/api/documents")).await
    }

    pub async fn document(&self, id: i32) -> Result<Document, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/documents/{}", id))).await
    }

    pub async fn create_document(&self, draft: &DocumentDraft) -> Result<DocumentMessage, ClientError> {
        self.send(self.request(Method::POST, "/api/documents").json(draft)).await
    }

    pub async fn update_document(&self, id: i32, draft: &DocumentDraft) -> Result<DocumentMessage, ClientError> {
        self.send(self.request(Method::PUT, &format!("/api/documents/{}", id)).json(draft)).await
    }

    pub async fn delete_document(&self, id: i32) -> Result<Message, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/documents/{}", id))).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<Message, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/users/{}", id))).await
    }

    pub async fn search_public_documents(&self, title: &str) -> Result<DocumentList, ClientError> {
        let request = self.request(Method::GET, "/api/search/documents/").query(&[("title", title)]);
        self.send(request).await
    }

    pub async fn search_my_documents(&self, title: &str) -> Result<DocumentList, ClientError> {
        let request = self.request(Method::GET, "/api/search/myDocuments/").query(&[("title", title)]);
        self.send(request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turn a non-2xx answer into [`ClientError::Api`] carrying the server's `message`
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(ClientError::Api { status, message })
}
