//! Document types for the storage layer.
//!
//! Articles embed their comments and users embed their credential record, so
//! every read returns a whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::CredentialRecord;

/// Metadata for a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// When this store was created
    pub created_at: DateTime<Utc>,
}

/// A comment embedded in an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// An article document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// URL slug, unique
    pub name: String,

    /// Display title
    pub title: String,

    /// Number of upvotes received
    pub upvotes: i64,

    /// Comments in the order they were posted
    pub comments: Vec<Comment>,

    /// When this article was created
    pub created_at: DateTime<Utc>,
}

/// A user account document.
///
/// Deliberately not `Serialize`: the credential must never leave the server.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Name shown next to the user's activity
    pub display_name: String,

    /// Normalized (trimmed, lowercase) email, unique
    pub email: String,

    /// Salted password digest
    pub credential: CredentialRecord,

    /// When this user registered
    pub created_at: DateTime<Utc>,
}

/// Builder for creating new articles.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub name: String,
    pub title: String,
}

impl NewArticle {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

/// Builder for appending a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub username: String,
    pub text: String,
}

impl NewComment {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
        }
    }
}

/// Builder for creating new users.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub credential: CredentialRecord,
}

impl NewUser {
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        credential: CredentialRecord,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            credential,
        }
    }
}

/// Filter for listing articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
