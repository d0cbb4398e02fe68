// HTTP handlers for registration, login and token refresh

use crate::error::ApiError;
use crate::users::models::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use validator::Validate;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

fn refresh_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie
}

/// POST /user/register
///
/// Creates the account and returns 201 with the account summary and access
/// token in the body; the refresh token is set as the `refresh_token`
/// cookie.
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<RegisterResponse>), ApiError> {
    payload.validate()?;

    let (user, pair) = state.users.sign_up(&payload.email, &payload.password).await?;
    tracing::info!("registered user {}", user.id);

    let jar = jar.add(refresh_cookie(pair.refresh_token, state.secure_refresh_cookie));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse {
            user: user.into(),
            access_token: pair.access_token,
        }),
    ))
}

/// POST /user/login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    payload.validate()?;

    let pair = state.users.login(&payload.email, &payload.password).await?;

    let jar = jar.add(refresh_cookie(pair.refresh_token, state.secure_refresh_cookie));
    Ok((
        jar,
        Json(TokenResponse {
            access_token: pair.access_token,
        }),
    ))
}

/// POST /user/refresh
///
/// Reads the `refresh_token` cookie and rotates it: new access token in the
/// body, new refresh token overwriting the cookie.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("refresh token is required".to_string()))?;

    let pair = state.users.refresh(&refresh_token)?;

    let jar = jar.add(refresh_cookie(pair.refresh_token, state.secure_refresh_cookie));
    Ok((
        jar,
        Json(TokenResponse {
            access_token: pair.access_token,
        }),
    ))
}
