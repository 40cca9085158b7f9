//! Article endpoints: list, create, read, upvote, comment.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use blog_core::storage::{Article, ArticleFilter, DocumentStore, NewArticle, NewComment};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "comment")]
    pub text: String,
}

fn article_not_found(name: &str) -> ApiError {
    ApiError::NotFound(format!("Article \"{}\" not found", name))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let mut filter = ArticleFilter::new();
    if let Some(limit) = query.limit {
        filter = filter.limit(limit);
    }

    let articles = state
        .with_store(move |store, _| store.list_articles(&filter))
        .await?;
    Ok(Json(articles))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let Json(payload) = payload?;
    let new_article = NewArticle::new(payload.name, payload.title);
    let article = state
        .with_store(move |store, _| store.insert_article(&new_article))
        .await?;

    info!(article = %article.name, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let lookup = name.clone();
    state
        .with_store(move |store, _| store.get_article(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| article_not_found(&name))
}

pub async fn upvote_article(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let lookup = name.clone();
    state
        .with_store(move |store, _| store.upvote_article(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| article_not_found(&name))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let Json(payload) = payload?;
    let lookup = name.clone();
    let comment = NewComment::new(payload.username, payload.text);
    state
        .with_store(move |store, _| store.add_comment(&lookup, &comment))
        .await?
        .map(Json)
        .ok_or_else(|| article_not_found(&name))
}
