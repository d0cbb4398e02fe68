// JWT issuance, verification and rotation

use crate::error::ApiError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every signed token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (user id)
    pub sub: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

/// Access/refresh token pair returned on signup, login and refresh.
///
/// Pairs are never persisted; validity is decided at verification time from
/// the signature and the embedded expiry alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Capability boundary for token operations, so service-layer tests can
/// substitute a double.
pub trait TokenIssuer: Send + Sync {
    fn generate_token_pair(&self, subject: &str) -> Result<TokenPair, ApiError>;
    fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError>;
    fn verify_token(&self, access_token: &str) -> Result<String, ApiError>;
}

/// Token service signing and verifying with a single shared HMAC-SHA256
/// secret. Holds no mutable state and performs no I/O, so it is safe to call
/// concurrently from any number of request handlers.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl TokenService {
    /// Create a new TokenService from the shared secret and the configured
    /// token lifetimes.
    pub fn new(
        secret: &str,
        access_token_duration: Duration,
        refresh_token_duration: Duration,
    ) -> Self {
        // HS256 only; tokens signed with any other algorithm never reach
        // claim extraction.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_duration,
            refresh_token_duration,
        }
    }

    fn sign(&self, subject: &str, lifetime: Duration) -> Result<String, ApiError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::SystemError(format!("token signing failed: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => {
                    ApiError::InvalidRequest("unexpected signing algorithm".to_string())
                }
                ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("token has expired".to_string())
                }
                _ => ApiError::Unauthorized("invalid token".to_string()),
            })
    }
}

impl TokenIssuer for TokenService {
    /// Mint a fresh access/refresh pair bound to `subject`.
    ///
    /// The subject must be a UUID-shaped identifier; both tokens carry the
    /// same claim shape and differ only in expiry horizon.
    fn generate_token_pair(&self, subject: &str) -> Result<TokenPair, ApiError> {
        Uuid::parse_str(subject)
            .map_err(|_| ApiError::InvalidRequest("subject must be a valid uuid".to_string()))?;

        let access_token = self.sign(subject, self.access_token_duration)?;
        let refresh_token = self.sign(subject, self.refresh_token_duration)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Rotate a still-valid refresh token into a brand-new pair.
    ///
    /// The old refresh token is not invalidated server-side; the HTTP layer
    /// overwrites the client-held cookie with the new one.
    fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        if refresh_token.is_empty() {
            return Err(ApiError::InvalidRequest(
                "refresh token is required".to_string(),
            ));
        }

        let claims = self.decode_claims(refresh_token)?;

        self.generate_token_pair(&claims.sub)
            .map_err(|e| ApiError::Unauthorized(format!("token rotation failed: {}", e)))
    }

    /// Verify a presented token and recover its subject identifier.
    fn verify_token(&self, access_token: &str) -> Result<String, ApiError> {
        if access_token.is_empty() {
            return Err(ApiError::InvalidRequest(
                "access token is required".to_string(),
            ));
        }

        let claims = self.decode_claims(access_token)?;
        Ok(claims.sub)
    }
}
