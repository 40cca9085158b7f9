use std::path::PathBuf;
use std::sync::Arc;

use blog_core::crypto::CredentialHasher;
use blog_core::storage::{DocumentStore, SqliteStorage};
use tokio::task::spawn_blocking;

use crate::error::ApiError;

/// Shared, read-only server state. Nothing here is mutated after startup;
/// every request opens its own store connection.
pub struct AppState {
    pub database_path: PathBuf,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(database_path: PathBuf, hasher: CredentialHasher) -> Arc<Self> {
        Arc::new(Self {
            database_path,
            hasher,
        })
    }

    /// Open a store connection, run `operations` on it, and close it.
    ///
    /// Runs on the blocking pool since SQLite calls are synchronous. The
    /// connection is closed even when `operations` fails; the operation's
    /// error takes precedence over a close error.
    pub async fn with_store<T, F>(&self, operations: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteStorage, &CredentialHasher) -> blog_core::Result<T> + Send + 'static,
    {
        let path = self.database_path.clone();
        let hasher = self.hasher;

        spawn_blocking(move || -> blog_core::Result<T> {
            let mut store = SqliteStorage::open(&path)?;
            let outcome = operations(&mut store, &hasher);
            let closed = store.close();
            let value = outcome?;
            closed?;
            Ok(value)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
    }
}
