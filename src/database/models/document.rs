use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::AccessLevel;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub access: AccessLevel,
    #[serde(rename = "userID")]
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub access: AccessLevel,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub access: Option<AccessLevel>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.access.is_none()
    }
}

/// Selection criteria shared by every document listing and search.
/// All set fields must match.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub access: Option<AccessLevel>,
    pub owner_id: Option<i32>,
    /// Owner's role must equal this role id
    pub owner_role_id: Option<i32>,
    /// Case-insensitive substring of the title, matched literally
    pub title: Option<String>,
}

impl DocumentFilter {
    pub fn public() -> Self {
        Self { access: Some(AccessLevel::Public), ..Default::default() }
    }

    pub fn owned_by(user_id: i32) -> Self {
        Self { owner_id: Some(user_id), ..Default::default() }
    }

    /// Role-scoped documents: `access = role` and owned by someone holding `role_id`
    pub fn role_scoped(role_id: i32) -> Self {
        Self {
            access: Some(AccessLevel::Role),
            owner_role_id: Some(role_id),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
