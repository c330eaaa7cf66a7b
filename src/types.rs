/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Visibility classifier on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Private,
    Role,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid access level '{0}', expected one of: public, private, role")]
pub struct InvalidAccessLevel(pub String);

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Private => "private",
            AccessLevel::Role => "role",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = InvalidAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AccessLevel::Public),
            "private" => Ok(AccessLevel::Private),
            "role" => Ok(AccessLevel::Role),
            other => Err(InvalidAccessLevel(other.to_string())),
        }
    }
}

// sqlx decodes the TEXT column through this
impl TryFrom<String> for AccessLevel {
    type Error = InvalidAccessLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Role title that grants unrestricted CRUD
pub const ADMIN_ROLE: &str = "admin";

/// Role given to every self-registered user
pub const REGULAR_ROLE: &str = "regular";
