// Authorization gate for protected routes

use crate::auth::token::TokenIssuer;
use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

const BEARER: &str = "Bearer";

/// Verified identity of the caller, extracted from the `Authorization`
/// header on protected routes.
///
/// Declaring this extractor as a handler argument is what makes a route
/// protected: the request is rejected with 401 before the handler runs
/// unless a valid access token is presented.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<dyn TokenIssuer>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if auth_value.is_empty() {
            return Err(ApiError::Unauthorized(
                "Authorization header is required".to_string(),
            ));
        }

        let token = extract_bearer_token(auth_value).ok_or_else(|| {
            ApiError::Unauthorized("access token is required".to_string())
        })?;

        let tokens: Arc<dyn TokenIssuer> = FromRef::from_ref(state);
        let subject = tokens.verify_token(token).map_err(|e| match e {
            ApiError::Unauthorized(_) => e,
            other => {
                error!("token verification failed: {}", other);
                ApiError::SystemError("token verification failed".to_string())
            }
        })?;

        let user_id = Uuid::parse_str(&subject)
            .map_err(|_| ApiError::Unauthorized("invalid token".to_string()))?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Split the header value on a single space and require exactly
/// `Bearer <token>` with a non-empty token.
fn extract_bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}
