use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use blog_core::crypto::CredentialHasher;
use blog_server::error::AUTH_FAILED_MESSAGE;
use blog_server::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestServer {
    _dir: TempDir,
    router: Router,
}

impl TestServer {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("blog.db");
        assert!(blog_server::prepare_store(&path).unwrap());
        let state = AppState::new(path, CredentialHasher::default());
        Self {
            _dir: dir,
            router: blog_server::app(state),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(value) => {
                self.send_raw(method, uri, Some("application/json"), value.to_string())
                    .await
            }
            None => self.send_raw(method, uri, None, String::new()).await,
        }
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn signup(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/users",
                json!({ "displayName": "Ana", "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body
    }
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::new();
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], blog_core::VERSION);
}

#[tokio::test]
async fn signup_then_login() {
    let server = TestServer::new();
    let user = server.signup("Ana@Example.com", "hunter2").await;
    assert_eq!(user["email"], "ana@example.com");
    assert_eq!(user["displayName"], "Ana");
    assert!(user.get("credential").is_none());

    let (status, body) = server
        .post(
            "/api/login",
            json!({ "email": "ana@example.com", "password": "hunter2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], user["id"]);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let server = TestServer::new();
    server.signup("ana@example.com", "hunter2").await;

    let (wrong_status, wrong_body) = server
        .post(
            "/api/login",
            json!({ "email": "ana@example.com", "password": "hunter3" }),
        )
        .await;
    let (unknown_status, unknown_body) = server
        .post(
            "/api/login",
            json!({ "email": "nobody@example.com", "password": "hunter2" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], AUTH_FAILED_MESSAGE);
}

#[tokio::test]
async fn missing_or_non_string_password_is_rejected() {
    let server = TestServer::new();

    let (status, body) = server
        .post(
            "/api/users",
            json!({ "displayName": "Ana", "email": "ana@example.com", "password": null }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));

    let (status, _) = server
        .post(
            "/api/users",
            json!({ "displayName": "Ana", "email": "ana@example.com", "password": 12345 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, users) = server.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 0);

    let (status, _) = server
        .post("/api/login", json!({ "email": "ana@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let server = TestServer::new();
    server.signup("ana@example.com", "one").await;

    let (status, _) = server
        .post(
            "/api/users",
            json!({ "displayName": "Other", "email": "ANA@example.com", "password": "two" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn user_listing_and_deletion() {
    let server = TestServer::new();
    let ana = server.signup("ana@example.com", "one").await;
    server.signup("bo@example.com", "two").await;

    let (status, users) = server.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("credential").is_none()));

    let id = ana["id"].as_str().unwrap();
    let uri = format!("/api/users/{id}");
    let (status, body) = server.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = server.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .send(Method::DELETE, "/api/users/not-a-uuid", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, users) = server.get("/api/users").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn article_upvotes_and_comments() {
    let server = TestServer::new();

    let (status, article) = server
        .post(
            "/api/articles",
            json!({ "name": "learn-rust", "title": "Learn Rust" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(article["upvotes"], 0);

    for expected in 1..=3 {
        let (status, article) = server
            .post("/api/articles/learn-rust/upvote", json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(article["upvotes"], expected);
    }

    server
        .post(
            "/api/articles/learn-rust/comments",
            json!({ "username": "ana", "text": "first" }),
        )
        .await;
    let (status, article) = server
        .post(
            "/api/articles/learn-rust/comments",
            json!({ "username": "bo", "comment": "second" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let comments = article["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "first");
    assert_eq!(comments[1]["username"], "bo");
    assert_eq!(comments[1]["text"], "second");

    let (status, fetched) = server.get("/api/articles/learn-rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["upvotes"], 3);

    let (status, listed) = server.get("/api/articles?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_article_is_not_found() {
    let server = TestServer::new();

    let (status, body) = server.get("/api/articles/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("nope"));

    let (status, _) = server.post("/api/articles/nope/upvote", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post(
            "/api/articles/nope/comments",
            json!({ "username": "ana", "text": "hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_article_name_is_bad_request() {
    let server = TestServer::new();
    let (status, _) = server
        .post("/api/articles", json!({ "name": "has spaces", "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_bodies_get_json_error_envelope() {
    let server = TestServer::new();

    let (status, body) = server
        .send_raw(
            Method::POST,
            "/api/login",
            Some("application/json"),
            "{not json".to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = server
        .send_raw(
            Method::POST,
            "/api/users",
            None,
            json!({ "displayName": "Ana", "email": "ana@example.com", "password": "pw" })
                .to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = server
        .send_raw(
            Method::POST,
            "/api/articles",
            Some("text/plain"),
            "learn-rust".to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (_, users) = server.get("/api/users").await;
    assert_eq!(users.as_array().unwrap().len(), 0);
}
