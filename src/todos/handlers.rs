// HTTP handlers for the to-do endpoints (all behind the authorization gate)

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::todos::models::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

/// GET /todos
pub async fn list_todos_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Todo>>, ApiError> {
    // Resolve the subject to a stored account before touching its items
    let account = state.users.fetch_by_id(user.user_id).await?;
    let todos = state.todos.fetch_all_by_user(account.id).await?;
    Ok(Json(todos))
}

/// POST /todos
pub async fn create_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    payload.validate()?;

    let account = state.users.fetch_by_id(user.user_id).await?;
    let todo = state.todos.create(account.id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos/:id
pub async fn get_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    let account = state.users.fetch_by_id(user.user_id).await?;
    let todo = state.todos.fetch_by_id(account.id, id).await?;
    Ok(Json(todo))
}

/// PUT /todos/:id
pub async fn update_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    payload.validate()?;

    let account = state.users.fetch_by_id(user.user_id).await?;
    let todo = state
        .todos
        .update(
            account.id,
            id,
            &payload.content,
            payload.completed,
            payload.deleted,
        )
        .await?;
    Ok(Json(todo))
}

/// DELETE /todos/:id
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let account = state.users.fetch_by_id(user.user_id).await?;
    state.todos.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
