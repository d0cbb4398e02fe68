// Account service: registration, login and token refresh

use crate::auth::password;
use crate::auth::token::{TokenIssuer, TokenPair};
use crate::error::ApiError;
use crate::users::models::User;
use crate::users::repository::UserStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 5;

/// Orchestrates the credential store, password hasher and token issuer.
pub struct UserService {
    store: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenIssuer>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// Register a new account and mint its first token pair.
    ///
    /// The store write and the token mint are not atomic: a signing failure
    /// after the insert leaves the account persisted while the client sees
    /// an error. Registration is at-least-once from the store's view; the
    /// client recovers by logging in.
    pub async fn sign_up(&self, email: &str, plain_password: &str) -> Result<(User, TokenPair), ApiError> {
        if !validator::validate_email(email) {
            return Err(ApiError::InvalidRequest("invalid email".to_string()));
        }
        if plain_password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::InvalidRequest(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        // Found is a business error; only an absent user may register.
        // Store failures propagate as-is so "retry later" stays
        // distinguishable from "already taken".
        if self.store.fetch_by_email(email).await?.is_some() {
            return Err(ApiError::InvalidRequest("email already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash_password(plain_password)?,
            created_at: Utc::now(),
        };
        self.store.store(&user).await?;

        let pair = self
            .tokens
            .generate_token_pair(&user.id.to_string())
            .map_err(|e| {
                warn!("token minting failed after account creation: {}", e);
                e
            })?;

        Ok((user, pair))
    }

    /// Verify a password credential and mint a token pair.
    pub async fn login(&self, email: &str, plain_password: &str) -> Result<TokenPair, ApiError> {
        let user = self
            .store
            .fetch_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        // Mismatch and malformed stored hash both present as the same 401
        match password::verify_password(&user.password_hash, plain_password) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ApiError::Unauthorized(
                    "invalid email or password".to_string(),
                ))
            }
            Err(e) => {
                warn!("password verification failed for {}: {}", user.id, e);
                return Err(ApiError::Unauthorized(
                    "invalid email or password".to_string(),
                ));
            }
        }

        self.tokens.generate_token_pair(&user.id.to_string())
    }

    /// Rotate a refresh token into a new pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        self.tokens.refresh_token(refresh_token)
    }

    pub async fn fetch_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }
}
