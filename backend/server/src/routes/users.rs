use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use models::{User, UserView};
use tracing::info;

use super::Payload;
use crate::{auth::hash_password, error::AppError, state::SharedState, utils::require};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/users", get(list_handler))
        .route("/api/users/create", post(create_handler))
        .route("/api/users/{id}", get(get_handler).delete(delete_handler))
}

pub fn public_routes() -> Router<SharedState> {
    Router::new().route("/api/users/exists/{username}", get(exists_handler))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut user): Payload<User>,
) -> Result<Json<UserView>, AppError> {
    let username = require(&Some(user.username.clone()), "username")?.to_string();

    let users = state.collection::<User>();
    if users.exists_where(|u| u.username == username).await? {
        return Err(AppError::Conflict(format!("Username {username} is taken")));
    }

    user.username = username;
    if let Some(password) = user.password.take().filter(|p| !p.is_empty()) {
        user.password = Some(hash_password(password, state.config.bcrypt_cost).await?);
    }

    let user = users.insert(user).await?;
    info!("Created user {}", user.username);

    Ok(Json(user.into()))
}

async fn list_handler(State(state): State<SharedState>) -> Result<Json<Vec<UserView>>, AppError> {
    let users = state.collection::<User>().find_all().await?;

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Unknown ids answer `null` rather than 404.
async fn get_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Option<UserView>>, AppError> {
    let user = state.collection::<User>().find_by_id(&id).await?;

    Ok(Json(user.map(UserView::from)))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<User>().delete_by_id(&id).await?;

    Ok(StatusCode::OK)
}

async fn exists_handler(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<bool>, AppError> {
    let exists = state
        .collection::<User>()
        .exists_where(|u| u.username == username)
        .await?;

    Ok(Json(exists))
}
