use axum::{
    Json, Router,
    extract::{Query, State},
    http::{
        HeaderMap, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use models::User;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{Payload, saved_id};
use crate::{
    auth::{hash_password, verify_password},
    error::AppError,
    oauth,
    state::SharedState,
    token::{STATE_TTL_MINUTES, TokenPair},
    utils::{cookie_value, require},
};

const NONCE_COOKIE: &str = "paf_oauth_nonce";

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/token", post(token_handler))
        .route("/oauth2/authorization/google", get(google_login_handler))
        .route("/login/oauth2/code/google", get(google_callback_handler))
}

async fn register_handler(
    State(state): State<SharedState>,
    Payload(credentials): Payload<Credentials>,
) -> Result<Json<TokenPair>, AppError> {
    let username = require(&credentials.username, "username")?;
    let password = require(&credentials.password, "password")?;

    let users = state.collection::<User>();
    if users.exists_where(|u| u.username == username).await? {
        return Err(AppError::Conflict(format!("Username {username} is taken")));
    }

    let mut user = User::new(username);
    user.password = Some(hash_password(password.to_string(), state.config.bcrypt_cost).await?);
    let user = users.insert(user).await?;

    info!("Registered user {username}");
    Ok(Json(state.tokens.issue(&saved_id(user.id)?)?))
}

async fn login_handler(
    State(state): State<SharedState>,
    Payload(credentials): Payload<Credentials>,
) -> Result<Json<TokenPair>, AppError> {
    let username = require(&credentials.username, "username")?;
    let password = require(&credentials.password, "password")?;

    info!("Login attempt for {username}");

    let user = state
        .collection::<User>()
        .find_one_where(|u| u.username == username)
        .await?
        .filter(User::is_active)
        .ok_or(AppError::InvalidCredentials)?;

    let hash = user.password.clone().ok_or(AppError::InvalidCredentials)?;
    if !verify_password(password.to_string(), hash).await? {
        warn!("Wrong password for {username}");
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(state.tokens.issue(&saved_id(user.id)?)?))
}

async fn token_handler(
    State(state): State<SharedState>,
    Payload(request): Payload<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let refresh_token = require(&request.refresh_token, "refreshToken")?;

    Ok(Json(state.tokens.refresh(refresh_token)?))
}

/// Redirect that also sets the OAuth nonce cookie. A zero `max_age` clears it.
fn found_with_nonce(location: &str, nonce: &str, max_age: i64) -> Response {
    let cookie = format!(
        "{NONCE_COOKIE}={nonce}; Max-Age={max_age}; Path=/login/oauth2; HttpOnly; SameSite=Lax"
    );

    (
        StatusCode::FOUND,
        [(LOCATION, location.to_string()), (SET_COOKIE, cookie)],
    )
        .into_response()
}

async fn google_login_handler(State(state): State<SharedState>) -> Result<Response, AppError> {
    let google = state.config.google.as_ref().ok_or(AppError::NotFound)?;

    let nonce = Uuid::new_v4().simple().to_string();
    let signed_state = state.tokens.sign_state(&nonce)?;
    let url = oauth::authorization_url(google, &state.config.oauth_redirect_uri(), &signed_state)?;

    Ok(found_with_nonce(url.as_str(), &nonce, STATE_TTL_MINUTES * 60))
}

async fn google_callback_handler(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let google = state.config.google.as_ref().ok_or(AppError::NotFound)?;

    let claims = state
        .tokens
        .verify_state(query.state.as_deref().unwrap_or_default())?;
    if cookie_value(&headers, NONCE_COOKIE) != Some(claims.sub.as_str()) {
        warn!("OAuth state was issued to another browser");
        return Err(AppError::Unauthorized);
    }

    if let Some(error) = query.error {
        warn!("Google sign-in refused: {error}");
        return Err(AppError::Unauthorized);
    }
    let code = require(&query.code, "code")?;

    let redirect_uri = state.config.oauth_redirect_uri();
    let email = oauth::fetch_email(&state.http, google, &redirect_uri, code).await?;
    let user = oauth::find_or_create_user(&state.collection::<User>(), &email).await?;
    let tokens = state.tokens.issue(&saved_id(user.id)?)?;

    info!("Google sign-in for {email}");
    let url = oauth::callback_url(&state.config.frontend_origin, &tokens)?;

    Ok(found_with_nonce(url.as_str(), "", 0))
}
