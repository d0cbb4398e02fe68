// Application configuration loaded from environment variables

use chrono::Duration;

/// Process-wide configuration, read once at startup and passed down
/// explicitly. Nothing here mutates after load.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: String,

    /// Shared symmetric signing secret for access and refresh tokens
    pub auth_secret: String,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,

    /// Whether the refresh_token cookie is marked Secure
    pub secure_refresh_cookie: bool,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `AUTH_SECRET`, `DATABASE_URL` and `SECURE_REFRESH_COOKIE` are
    /// required; token lifetimes default to 6 hours (access) and 720 hours
    /// (refresh).
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let auth_secret =
            std::env::var("AUTH_SECRET").map_err(|_| "AUTH_SECRET must be set".to_string())?;

        let secure_refresh_cookie = std::env::var("SECURE_REFRESH_COOKIE")
            .map_err(|_| "SECURE_REFRESH_COOKIE must be set".to_string())?
            .parse::<bool>()
            .map_err(|_| "SECURE_REFRESH_COOKIE must be true or false".to_string())?;

        let access_hours = env_hours("AUTH_ACCESS_TOKEN_HOURS", 6)?;
        let refresh_hours = env_hours("AUTH_REFRESH_TOKEN_HOURS", 720)?;

        Ok(Self {
            database_url,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()),
            auth_secret,
            access_token_duration: Duration::hours(access_hours),
            refresh_token_duration: Duration::hours(refresh_hours),
            secure_refresh_cookie,
        })
    }
}

fn env_hours(name: &str, default: i64) -> Result<i64, String> {
    match std::env::var(name) {
        Ok(v) => v
            .parse::<i64>()
            .map_err(|_| format!("{} must be an integer number of hours", name)),
        Err(_) => Ok(default),
    }
}
