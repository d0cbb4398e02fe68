// To-do persistence

use crate::error::ApiError;
use crate::todos::models::Todo;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn store(&self, todo: &Todo) -> Result<(), ApiError>;
    async fn update(&self, todo: &Todo) -> Result<(), ApiError>;
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Todo>, ApiError>;
    async fn fetch_all_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, ApiError>;
}

/// PostgreSQL-backed to-do repository
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TODO_COLS: &str = "id, user_id, content, completed, created_at, updated_at, deleted";

#[async_trait]
impl TodoStore for TodoRepository {
    async fn store(&self, todo: &Todo) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO todos (id, user_id, content, completed, created_at, updated_at, deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(todo.id)
        .bind(todo.user_id)
        .bind(&todo.content)
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .bind(todo.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, todo: &Todo) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE todos SET content = $1, completed = $2, deleted = $3, updated_at = $4 \
             WHERE id = $5",
        )
        .bind(&todo.content)
        .bind(todo.completed)
        .bind(todo.deleted)
        .bind(todo.updated_at)
        .bind(todo.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Todo>, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1",
            TODO_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn fetch_all_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, ApiError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE user_id = $1 AND deleted = FALSE ORDER BY created_at",
            TODO_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }
}

/// In-memory to-do store for service-level and HTTP-level tests.
#[cfg(test)]
pub struct InMemoryTodoStore {
    todos: std::sync::Mutex<Vec<Todo>>,
}

#[cfg(test)]
impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self {
            todos: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn store(&self, todo: &Todo) -> Result<(), ApiError> {
        self.todos.lock().unwrap().push(todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> Result<(), ApiError> {
        let mut todos = self.todos.lock().unwrap();
        if let Some(existing) = todos.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo.clone();
        }
        Ok(())
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Todo>, ApiError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn fetch_all_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, ApiError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos
            .iter()
            .filter(|t| t.user_id == user_id && !t.deleted)
            .cloned()
            .collect())
    }
}
