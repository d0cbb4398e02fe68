// Credential store: user persistence

use crate::error::ApiError;
use crate::users::models::User;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Credential store seam. `Option` returns keep "no such user" distinct
/// from infrastructure failure, which the duplicate-email check in the
/// service layer depends on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn store(&self, user: &User) -> Result<(), ApiError>;
}

/// PostgreSQL-backed user repository
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn store(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// In-memory credential store used by service-level and HTTP-level tests.
#[cfg(test)]
pub struct InMemoryUserStore {
    users: std::sync::Mutex<Vec<User>>,
}

#[cfg(test)]
impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn store(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        users.push(user.clone());
        Ok(())
    }
}
