//! Account endpoints: list, signup, delete, login.
//!
//! Password fields are taken as raw JSON values and coerced through
//! `blog_core::crypto::arguments`, so `null` or a non-string password is an
//! `InvalidArgument` (400) rather than a deserialization failure.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use blog_core::accounts::{login as attempt_login, register, LoginOutcome, Signup};
use blog_core::crypto::arguments::string_arg;
use blog_core::storage::DocumentStore;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{users_view, LoginView, UserView};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub display_name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub password: Value,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub password: Value,
}

fn owned_arg(name: &str, value: &Value) -> Result<Option<String>, ApiError> {
    Ok(string_arg(name, value)?.map(str::to_owned))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.with_store(|store, _| store.list_users()).await?;
    Ok(Json(users_view(&users)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(payload) = payload?;
    let display_name = owned_arg("displayName", &payload.display_name)?;
    let email = owned_arg("email", &payload.email)?;
    let password = owned_arg("password", &payload.password)?;

    let user = state
        .with_store(move |store, hasher| {
            let signup = Signup {
                display_name: display_name.as_deref(),
                email: email.as_deref(),
                password: password.as_deref(),
            };
            register(store, hasher, &signup)
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid user ID: {}", id)))?;

    let removed = state
        .with_store(move |store, _| store.delete_user(&id))
        .await?;
    if !removed {
        return Err(ApiError::NotFound(format!("User {} not found", id)));
    }

    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginView>, ApiError> {
    let Json(payload) = payload?;
    let email = owned_arg("email", &payload.email)?;
    let password = owned_arg("password", &payload.password)?;

    let outcome = state
        .with_store(move |store, _| {
            attempt_login(&*store, email.as_deref(), password.as_deref())
        })
        .await?;

    match outcome {
        LoginOutcome::Authenticated(user) => {
            info!(user_id = %user.id, "login succeeded");
            Ok(Json(LoginView::new(&user)))
        }
        failed => {
            warn!(reason = failed.reason(), "login failed");
            Err(ApiError::AuthenticationFailed)
        }
    }
}
