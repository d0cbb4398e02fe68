// End-to-end HTTP tests over in-memory store doubles
// Exercises the full register -> login -> refresh -> protected-route flow
// without a database.

use crate::auth::{TokenIssuer, TokenService};
use crate::todos::repository::InMemoryTodoStore;
use crate::todos::TodoService;
use crate::users::repository::InMemoryUserStore;
use crate::users::UserService;
use crate::{create_router, AppState};
use axum::http::{header, StatusCode};
use axum_test::TestServer;
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

fn test_state() -> AppState {
    let tokens: Arc<dyn TokenIssuer> = Arc::new(TokenService::new(
        TEST_SECRET,
        Duration::hours(6),
        Duration::hours(720),
    ));

    AppState {
        users: Arc::new(UserService::new(
            Arc::new(InMemoryUserStore::new()),
            tokens.clone(),
        )),
        todos: Arc::new(TodoService::new(Arc::new(InMemoryTodoStore::new()))),
        tokens,
        secure_refresh_cookie: false,
    }
}

fn test_server() -> TestServer {
    TestServer::new(create_router(test_state())).unwrap()
}

/// Pull the refresh_token value out of the Set-Cookie response header
fn refresh_cookie_value(response: &axum_test::TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name == "refresh_token").then(|| value.to_string())
        })
}

async fn register(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/user/register")
        .json(&json!({ "email": email, "password": password }))
        .await
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_needs_no_auth() {
    let server = test_server();
    let response = server.get("/_health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().is_empty());
}

// ============================================================================
// Registration, login and refresh
// ============================================================================

#[tokio::test]
async fn test_register_login_refresh_flow() {
    let server = test_server();

    // register: 201, access token in body, refresh token as cookie
    let response = register(&server, "hatsune@miku.com", "very-strong-password").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    let register_access = body["access_token"].as_str().unwrap().to_string();
    assert!(!register_access.is_empty());
    assert_eq!(body["user"]["email"], "hatsune@miku.com");
    assert!(refresh_cookie_value(&response).is_some());

    // login with the same credentials: 200 with a different access token
    let response = server
        .post("/user/login")
        .json(&json!({ "email": "hatsune@miku.com", "password": "very-strong-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let login_access = body["access_token"].as_str().unwrap().to_string();
    assert!(!login_access.is_empty());
    assert_ne!(login_access, register_access);

    let login_refresh = refresh_cookie_value(&response).unwrap();

    // refresh with the login cookie: 200 with a new token and rotated cookie
    let response = server
        .post("/user/refresh")
        .add_header(
            header::COOKIE,
            format!("refresh_token={}", login_refresh).parse().unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    let rotated = refresh_cookie_value(&response).unwrap();
    assert_ne!(rotated, login_refresh);
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected() {
    let server = test_server();

    let response = register(&server, "a@b.com", "password").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = register(&server, "a@b.com", "other-password").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_invalid_payloads_are_rejected() {
    let server = test_server();

    let response = register(&server, "not-an-email", "password").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = register(&server, "a@b.com", "pw").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures() {
    let server = test_server();
    register(&server, "a@b.com", "password").await;

    let response = server
        .post("/user/login")
        .json(&json!({ "email": "a@b.com", "password": "wrong-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/user/login")
        .json(&json!({ "email": "nobody@nowhere.com", "password": "password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let server = test_server();
    let response = server.post("/user/refresh").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_garbage_cookie_is_unauthorized() {
    let server = test_server();
    let response = server
        .post("/user/refresh")
        .add_header(
            header::COOKIE,
            "refresh_token=not.a.valid.jwt".parse().unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Authorization gate on protected routes
// ============================================================================

#[tokio::test]
async fn test_protected_route_requires_header() {
    let server = test_server();
    let response = server.get("/todos").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_basic_scheme() {
    let server = test_server();
    let response = server
        .get("/todos")
        .add_header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let server = test_server();
    let response = server
        .get("/todos")
        .add_header(
            header::AUTHORIZATION,
            "Bearer not.a.valid.jwt".parse().unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_token_from_other_secret() {
    let server = test_server();
    register(&server, "a@b.com", "password").await;

    let forged = TokenService::new("another_secret", Duration::hours(6), Duration::hours(720))
        .generate_token_pair(&uuid::Uuid::new_v4().to_string())
        .unwrap();
    let response = server
        .get("/todos")
        .add_header(
            header::AUTHORIZATION,
            format!("Bearer {}", forged.access_token).parse().unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// To-do CRUD through the gate
// ============================================================================

async fn register_and_get_token(server: &TestServer, email: &str) -> String {
    let response = register(server, email, "password").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_todo_crud_flow() {
    let server = test_server();
    let token = register_and_get_token(&server, "a@b.com").await;
    let bearer = format!("Bearer {}", token);

    // create
    let response = server
        .post("/todos")
        .add_header(header::AUTHORIZATION, bearer.parse().unwrap())
        .json(&json!({ "content": "buy milk" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let todo: Value = response.json();
    let todo_id = todo["id"].as_str().unwrap().to_string();
    assert_eq!(todo["content"], "buy milk");
    assert_eq!(todo["completed"], false);

    // list
    let response = server
        .get("/todos")
        .add_header(header::AUTHORIZATION, bearer.parse().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let todos: Value = response.json();
    assert_eq!(todos.as_array().unwrap().len(), 1);

    // update
    let response = server
        .put(&format!("/todos/{}", todo_id))
        .add_header(header::AUTHORIZATION, bearer.parse().unwrap())
        .json(&json!({ "content": "buy oat milk", "completed": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["content"], "buy oat milk");
    assert_eq!(updated["completed"], true);

    // delete (soft)
    let response = server
        .delete(&format!("/todos/{}", todo_id))
        .add_header(header::AUTHORIZATION, bearer.parse().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // deleted items disappear from the listing
    let response = server
        .get("/todos")
        .add_header(header::AUTHORIZATION, bearer.parse().unwrap())
        .await;
    let todos: Value = response.json();
    assert!(todos.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_todo_is_scoped_to_its_owner() {
    let server = test_server();
    let owner_token = register_and_get_token(&server, "owner@b.com").await;
    let other_token = register_and_get_token(&server, "other@b.com").await;

    let response = server
        .post("/todos")
        .add_header(
            header::AUTHORIZATION,
            format!("Bearer {}", owner_token).parse().unwrap(),
        )
        .json(&json!({ "content": "private" }))
        .await;
    let todo: Value = response.json();
    let todo_id = todo["id"].as_str().unwrap();

    let response = server
        .get(&format!("/todos/{}", todo_id))
        .add_header(
            header::AUTHORIZATION,
            format!("Bearer {}", other_token).parse().unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
