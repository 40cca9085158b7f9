//! HTTP handlers. Each one opens a store connection through
//! [`AppState::with_store`](crate::state::AppState::with_store), runs one or
//! two document operations, and returns JSON.

pub mod articles;
pub mod users;

use axum::Json;
use blog_core::VERSION;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}
