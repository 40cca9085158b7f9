//! # Blog Server
//!
//! JSON API for the blog backend: articles with upvotes and comments, and
//! user accounts with salted HMAC-SHA-512 credentials.
//!
//! ## Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/articles` | list articles (`?limit=`) |
//! | POST | `/api/articles` | create `{name, title}` |
//! | GET | `/api/articles/:name` | read one |
//! | POST | `/api/articles/:name/upvote` | add one upvote |
//! | POST | `/api/articles/:name/comments` | append `{username, text}` |
//! | GET | `/api/users` | list accounts (no credentials) |
//! | POST | `/api/users` | signup `{displayName, email, password}` |
//! | DELETE | `/api/users/:id` | delete account |
//! | POST | `/api/login` | `{email, password}` |
//! | GET | `/health` | liveness |
//!
//! Every request opens its own store connection and closes it before
//! responding. Login failures get one 401 body whether the account is
//! missing or the password is wrong; the distinction only reaches the logs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use blog_core::storage::{DocumentStore, SqliteStorage};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;

use config::BlogConfig;
use routes::{articles, health, users};
use state::AppState;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

/// Build the API router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/api/articles/:name", get(articles::get_article))
        .route("/api/articles/:name/upvote", post(articles::upvote_article))
        .route("/api/articles/:name/comments", post(articles::add_comment))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/login", post(users::login))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Create the store (and its parent directory) if it does not exist yet.
///
/// Returns `true` if a new store was created.
pub fn prepare_store(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    SqliteStorage::create(path)
        .with_context(|| format!("Failed to create store at {}", path.display()))?;
    Ok(true)
}

/// Serve the API until Ctrl+C or SIGTERM.
pub async fn serve(config: &BlogConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(
        store = %state.database_path.display(),
        "Server running on {address}"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
