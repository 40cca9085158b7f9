//! Row types for database queries.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::crypto::CredentialRecord;
use crate::error::{BlogError, Result};
use crate::storage::types::{Article, Comment, User};

pub const ARTICLE_COLUMNS: &str = "name, title, upvotes, comments_json, created_at";

pub const USER_COLUMNS: &str =
    "id, display_name, email, password_salt, password_digest, created_at";

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| BlogError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

/// Raw row data from the articles table, before parsing into domain types.
#[derive(Debug)]
pub struct ArticleRow {
    pub name: String,
    pub title: String,
    pub upvotes: i64,
    pub comments_json: String,
    pub created_at: String,
}

impl ArticleRow {
    /// Read a row selected with [`ARTICLE_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            title: row.get(1)?,
            upvotes: row.get(2)?,
            comments_json: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

pub fn parse_comments(comments_json: &str) -> Result<Vec<Comment>> {
    serde_json::from_str(comments_json)
        .map_err(|e| BlogError::Storage(format!("Invalid comments JSON: {}", e)))
}

impl TryFrom<ArticleRow> for Article {
    type Error = BlogError;

    fn try_from(row: ArticleRow) -> Result<Self> {
        let comments = parse_comments(&row.comments_json)?;
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(Article {
            name: row.name,
            title: row.title,
            upvotes: row.upvotes,
            comments,
            created_at,
        })
    }
}

/// Raw row data from the users table.
#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub password_salt: String,
    pub password_digest: String,
    pub created_at: String,
}

impl UserRow {
    /// Read a row selected with [`USER_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            display_name: row.get(1)?,
            email: row.get(2)?,
            password_salt: row.get(3)?,
            password_digest: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = BlogError;

    fn try_from(row: UserRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| BlogError::Storage(format!("Invalid user UUID: {}", e)))?;
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(User {
            id,
            display_name: row.display_name,
            email: row.email,
            credential: CredentialRecord::from_parts(row.password_salt, row.password_digest),
            created_at,
        })
    }
}
