pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod todos;
pub mod users;

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use auth::{TokenIssuer, TokenService};
use config::AppConfig;
use todos::{TodoRepository, TodoService};
use users::{UserRepository, UserService};

/// Application state shared across handlers.
///
/// Concrete dependencies are wired here at startup (explicit constructor
/// injection); the trait objects exist so tests can substitute doubles.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub todos: Arc<TodoService>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub secure_refresh_cookie: bool,
}

impl FromRef<AppState> for Arc<dyn TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // liveness probe, unprotected
        .route("/_health", get(health_handler))
        // account endpoints
        .route("/user/register", post(users::handlers::register_handler))
        .route("/user/login", post(users::handlers::login_handler))
        .route("/user/refresh", post(users::handlers::refresh_handler))
        // protected to-do endpoints
        .route("/todos", get(todos::handlers::list_todos_handler))
        .route("/todos", post(todos::handlers::create_todo_handler))
        .route("/todos/:id", get(todos::handlers::get_todo_handler))
        .route("/todos/:id", put(todos::handlers::update_todo_handler))
        .route("/todos/:id", delete(todos::handlers::delete_todo_handler))
        .layer(cors)
        .with_state(state)
}

/// GET /_health
async fn health_handler() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("todo API - starting...");

    let config = AppConfig::from_env().expect("invalid configuration");

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let tokens: Arc<dyn TokenIssuer> = Arc::new(TokenService::new(
        &config.auth_secret,
        config.access_token_duration,
        config.refresh_token_duration,
    ));
    let users = Arc::new(UserService::new(
        Arc::new(UserRepository::new(pool.clone())),
        tokens.clone(),
    ));
    let todos = Arc::new(TodoService::new(Arc::new(TodoRepository::new(pool))));

    let state = AppState {
        users,
        todos,
        tokens,
        secure_refresh_cookie: config.secure_refresh_cookie,
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("todo API is running on http://{}", addr);
    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
