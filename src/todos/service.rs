// To-do business logic with per-user ownership checks

use crate::error::ApiError;
use crate::todos::models::Todo;
use crate::todos::repository::TodoStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: Uuid, content: &str) -> Result<Todo, ApiError> {
        if content.is_empty() {
            return Err(ApiError::InvalidRequest("content is required".to_string()));
        }

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
            deleted: false,
        };
        self.store.store(&todo).await?;

        Ok(todo)
    }

    pub async fn fetch_all_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, ApiError> {
        self.store.fetch_all_by_user(user_id).await
    }

    /// Fetch one item, refusing access to another user's item.
    pub async fn fetch_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Todo, ApiError> {
        let todo = self
            .store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("todo not found".to_string()))?;

        if todo.user_id != user_id {
            return Err(ApiError::Unauthorized("not your todo".to_string()));
        }

        Ok(todo)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        content: &str,
        completed: bool,
        deleted: bool,
    ) -> Result<Todo, ApiError> {
        if content.is_empty() {
            return Err(ApiError::InvalidRequest("content is required".to_string()));
        }

        let mut todo = self.fetch_by_id(user_id, id).await?;
        todo.content = content.to_string();
        todo.completed = completed;
        todo.deleted = deleted;
        todo.updated_at = Utc::now();

        self.store.update(&todo).await?;
        Ok(todo)
    }

    /// Soft delete: the row stays, listings skip it.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let mut todo = self.fetch_by_id(user_id, id).await?;
        todo.deleted = true;
        todo.updated_at = Utc::now();

        self.store.update(&todo).await
    }
}
