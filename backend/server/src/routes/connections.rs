use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use models::UserConnection;

use super::Payload;
use crate::{error::AppError, state::SharedState, utils::require};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/userConnections", post(connect_handler))
        .route("/api/userConnections/{userId}", get(get_handler))
        .route(
            "/api/userConnections/{userId}/friends/{friendId}",
            delete(unfriend_handler),
        )
}

async fn get_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserConnection>, AppError> {
    state
        .collection::<UserConnection>()
        .find_one_where(|c| c.user_id.as_deref() == Some(user_id.as_str()))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Merges into the user's existing document (200) or creates it (201).
async fn connect_handler(
    State(state): State<SharedState>,
    Payload(mut incoming): Payload<UserConnection>,
) -> Result<(StatusCode, Json<UserConnection>), AppError> {
    let user_id = require(&incoming.user_id, "userId")?.to_string();
    let connections = state.collection::<UserConnection>();

    let existing = connections
        .find_one_where(|c| c.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    match existing {
        Some(mut connection) => {
            connection.add_friends(&incoming.friend_ids);

            Ok((StatusCode::OK, Json(connections.save(connection).await?)))
        }
        None => {
            incoming.dedup_friends();

            Ok((StatusCode::CREATED, Json(connections.insert(incoming).await?)))
        }
    }
}

async fn unfriend_handler(
    State(state): State<SharedState>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let connections = state.collection::<UserConnection>();

    let mut connection = connections
        .find_one_where(|c| c.user_id.as_deref() == Some(user_id.as_str()))
        .await?
        .ok_or(AppError::NotFound)?;

    connection.remove_friend(&friend_id);
    connections.save(connection).await?;

    Ok(StatusCode::NO_CONTENT)
}
