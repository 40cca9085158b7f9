//! Document store trait definition.
//!
//! The `DocumentStore` trait is one open connection to the store. Callers
//! open it, run a few operations, and close it; nothing is cached between
//! connections.

use std::path::Path;
use uuid::Uuid;

use super::types::{
    Article, ArticleFilter, NewArticle, NewComment, NewUser, StoreMetadata, User,
};
use crate::error::Result;

/// Document store interface for articles and user accounts.
///
/// All implementations must ensure:
/// - Each document is read and written as a whole
/// - Article names and user emails are unique
/// - Upvotes and comment appends do not lose concurrent updates
pub trait DocumentStore: Send + Sync {
    /// Create a new, empty store at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Storage` if the file already exists or cannot be
    /// written.
    fn create(path: &Path) -> Result<StoreMetadata>
    where
        Self: Sized;

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::StoreNotFound` if there is no store at `path`.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Close the connection.
    ///
    /// After calling this method, the store instance cannot be used.
    fn close(self) -> Result<()>;

    /// Get store metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    // --- Article operations ---

    /// Insert a new article with zero upvotes and no comments.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Validation` for an invalid name or title and
    /// `BlogError::Conflict` if the name is taken.
    fn insert_article(&mut self, article: &NewArticle) -> Result<Article>;

    /// Get an article by name.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(article))` if found, `Ok(None)` if not found.
    fn get_article(&self, name: &str) -> Result<Option<Article>>;

    /// List articles ordered by name.
    fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>>;

    /// Add one upvote to an article.
    ///
    /// # Returns
    ///
    /// Returns the updated article, or `None` if no article has that name.
    fn upvote_article(&mut self, name: &str) -> Result<Option<Article>>;

    /// Append a comment to an article.
    ///
    /// # Returns
    ///
    /// Returns the updated article, or `None` if no article has that name.
    fn add_comment(&mut self, name: &str, comment: &NewComment) -> Result<Option<Article>>;

    // --- User operations ---

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Validation` for an invalid display name or email
    /// and `BlogError::Conflict` if the email is taken.
    fn insert_user(&mut self, user: &NewUser) -> Result<User>;

    /// Get a user by ID.
    fn get_user(&self, id: &Uuid) -> Result<Option<User>>;

    /// Get a user by email (normalized before lookup).
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List users in registration order.
    fn list_users(&self) -> Result<Vec<User>>;

    /// Delete a user and their credential record.
    ///
    /// # Returns
    ///
    /// Returns `true` if a user was removed.
    fn delete_user(&mut self, id: &Uuid) -> Result<bool>;

    // --- Maintenance operations ---

    /// Check store integrity.
    ///
    /// Verifies:
    /// - SQLite page-level integrity
    /// - Required metadata keys
    /// - Embedded comment documents parse
    fn check_integrity(&self) -> Result<()>;
}
