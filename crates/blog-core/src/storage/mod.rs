//! Storage layer: the document store trait, its data types, and the SQLite
//! backend.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStorage;
pub use traits::DocumentStore;
pub use types::{
    Article, ArticleFilter, Comment, NewArticle, NewComment, NewUser, StoreMetadata, User,
};
