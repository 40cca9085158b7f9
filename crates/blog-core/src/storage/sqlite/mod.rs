//! SQLite storage backend.
//!
//! Each `SqliteStorage` is one connection to a store file. Articles keep
//! their comments as a JSON array column; users keep their credential record
//! in two columns of the same row.

mod row;
mod validation;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use crate::error::{BlogError, Result};
use crate::storage::traits::DocumentStore;
use crate::storage::types::{
    Article, ArticleFilter, Comment, NewArticle, NewComment, NewUser, StoreMetadata, User,
};

use row::{parse_comments, ArticleRow, UserRow, ARTICLE_COLUMNS, USER_COLUMNS};
use validation::{
    lookup_name, normalize_article_name, normalize_email, required_text, MAX_COMMENT_BYTES,
    MAX_TITLE_BYTES, MAX_USERNAME_BYTES,
};

/// On-disk format version written to the `meta` table.
pub const FORMAT_VERSION: &str = "0.1";

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite document store.
pub struct SqliteStorage {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BlogError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Path of the store file this connection was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query_article(conn: &Connection, name: &str) -> Result<Option<Article>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE name = ?", ARTICLE_COLUMNS),
                [name],
                ArticleRow::from_row,
            )
            .optional()?;
        row.map(Article::try_from).transpose()
    }

    fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<User>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column),
                [value],
                UserRow::from_row,
            )
            .optional()?;
        row.map(User::try_from).transpose()
    }

    fn read_meta(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or_else(|| BlogError::Storage(format!("Missing metadata key: {}", key)))
    }
}

/// Map a UNIQUE/PRIMARY KEY violation to `Conflict`, anything else to `Sqlite`.
fn conflict_on_unique(err: rusqlite::Error, message: String) -> BlogError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            BlogError::Conflict(message)
        }
        other => other.into(),
    }
}

impl DocumentStore for SqliteStorage {
    fn create(path: &Path) -> Result<StoreMetadata> {
        if path.exists() {
            return Err(BlogError::Storage("Store file already exists".to_string()));
        }

        let mut conn = Connection::open(path)?;
        let created_at = Utc::now();

        let tx = conn.transaction()?;
        tx.execute_batch(
            r#"
            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Articles: comments are an embedded JSON array
            CREATE TABLE articles (
                name TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
                comments_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );

            -- Users: the credential record lives on the account row
            CREATE TABLE users (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_salt TEXT NOT NULL,
                password_digest TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )?;
        tx.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        tx.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["created_at", created_at.to_rfc3339().as_str()],
        )?;
        tx.commit()?;

        conn.close().map_err(|(_, e)| BlogError::from(e))?;

        Ok(StoreMetadata {
            format_version: FORMAT_VERSION.to_string(),
            created_at,
        })
    }

    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BlogError::StoreNotFound);
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let format_version = Self::read_meta(&conn, "format_version")
            .map_err(|_| BlogError::Storage("Not a blog store (metadata missing)".to_string()))?;
        if format_version != FORMAT_VERSION {
            return Err(BlogError::Storage(format!(
                "Unsupported store format version: {}",
                format_version
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| BlogError::Storage("SQLite connection poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| BlogError::from(e))
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;

        let format_version = Self::read_meta(&conn, "format_version")?;
        let created_at_str = Self::read_meta(&conn, "created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| BlogError::Storage(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoreMetadata {
            format_version,
            created_at,
        })
    }

    fn insert_article(&mut self, article: &NewArticle) -> Result<Article> {
        let name = normalize_article_name(&article.name)?;
        let title = required_text("Title", &article.title, MAX_TITLE_BYTES)?;
        let created_at = Utc::now();

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO articles (name, title, upvotes, comments_json, created_at)
            VALUES (?, ?, 0, '[]', ?)
            "#,
            (&name, &title, created_at.to_rfc3339()),
        )
        .map_err(|e| conflict_on_unique(e, format!("Article \"{}\" already exists", name)))?;

        Ok(Article {
            name,
            title,
            upvotes: 0,
            comments: Vec::new(),
            created_at,
        })
    }

    fn get_article(&self, name: &str) -> Result<Option<Article>> {
        let conn = self.lock_conn()?;
        Self::query_article(&conn, &lookup_name(name))
    }

    fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let conn = self.lock_conn()?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM articles ORDER BY name LIMIT ?",
            ARTICLE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([limit], ArticleRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(Article::try_from).collect()
    }

    fn upvote_article(&mut self, name: &str) -> Result<Option<Article>> {
        let name = lookup_name(name);
        let mut conn = self.lock_conn()?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE articles SET upvotes = upvotes + 1 WHERE name = ?",
            [&name],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let article = Self::query_article(&tx, &name)?;
        tx.commit()?;

        Ok(article)
    }

    fn add_comment(&mut self, name: &str, comment: &NewComment) -> Result<Option<Article>> {
        let name = lookup_name(name);
        let username = required_text("Username", &comment.username, MAX_USERNAME_BYTES)?;
        let text = required_text("Comment", &comment.text, MAX_COMMENT_BYTES)?;

        let mut conn = self.lock_conn()?;

        // Immediate: take the write lock before reading so concurrent appends serialize.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let comments_json: Option<String> = tx
            .query_row(
                "SELECT comments_json FROM articles WHERE name = ?",
                [&name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(comments_json) = comments_json else {
            return Ok(None);
        };

        let mut comments = parse_comments(&comments_json)?;
        comments.push(Comment {
            username,
            text,
            created_at: Utc::now(),
        });
        let comments_json = serde_json::to_string(&comments)?;

        tx.execute(
            "UPDATE articles SET comments_json = ? WHERE name = ?",
            (&comments_json, &name),
        )?;
        let article = Self::query_article(&tx, &name)?;
        tx.commit()?;

        Ok(article)
    }

    fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        let display_name =
            required_text("Display name", &user.display_name, MAX_USERNAME_BYTES)?;
        let email = normalize_email(&user.email)?;
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let conn = self.lock_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?)",
                USER_COLUMNS
            ),
            (
                id.to_string(),
                &display_name,
                &email,
                user.credential.salt(),
                user.credential.digest(),
                created_at.to_rfc3339(),
            ),
        )
        .map_err(|e| conflict_on_unique(e, "Email is already registered".to_string()))?;

        Ok(User {
            id,
            display_name,
            email,
            credential: user.credential.clone(),
            created_at,
        })
    }

    fn get_user(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        Self::query_user(&conn, "id", &id.to_string())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        Self::query_user(&conn, "email", &email.trim().to_lowercase())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at, rowid",
            USER_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], UserRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(User::try_from).collect()
    }

    fn delete_user(&mut self, id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM users WHERE id = ?", [id.to_string()])?;
        Ok(removed > 0)
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(BlogError::Storage(format!(
                "SQLite integrity check failed: {}",
                status
            )));
        }

        for key in ["format_version", "created_at"] {
            Self::read_meta(&conn, key)?;
        }

        let mut stmt = conn.prepare("SELECT name, comments_json FROM articles")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (name, comments_json) = row?;
            parse_comments(&comments_json).map_err(|e| {
                BlogError::Storage(format!("Article \"{}\" has corrupt comments: {}", name, e))
            })?;
        }

        Ok(())
    }
}
