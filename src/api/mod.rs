//! JSON bodies exchanged over the REST surface.
//!
//! The handlers serialize these and the HTTP client deserializes them, so
//! both sides agree on field names (`metaData`, `userID`, ...).

use serde::{Deserialize, Serialize};

use crate::database::models::{Document, Role, User};
use crate::database::MetaData;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentList {
    pub documents: Vec<Document>,
    pub meta_data: MetaData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// `{message, document}` returned by create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMessage {
    pub message: String,
    pub document: Document,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub users: Vec<User>,
    pub meta_data: MetaData,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserMessage {
    pub message: String,
    pub user: User,
}

/// Signup and login answer
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleList {
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleMessage {
    pub message: String,
    pub role: Role,
}
