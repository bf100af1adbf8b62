use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use models::Notification;
use serde::Serialize;
use tracing::debug;

use super::Payload;
use crate::{error::AppError, repository::Collection, state::SharedState};

#[derive(Serialize)]
struct UnreadCount {
    count: usize,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/notifications", post(create_handler))
        .route("/api/notifications/user/{userId}", get(by_user_handler))
        .route("/api/notifications/unread/{userId}", get(unread_handler))
        .route(
            "/api/notifications/unread/{userId}/count",
            get(unread_count_handler),
        )
        .route("/api/notifications/read-all/{userId}", put(read_all_handler))
        .route("/api/notifications/{id}/read", put(read_handler))
        .route("/api/notifications/{id}", delete(delete_handler))
}

/// Notifications of `user_id`, newest first.
async fn for_user(
    notifications: &Collection<Notification>,
    user_id: &str,
    unread_only: bool,
) -> Result<Vec<Notification>, AppError> {
    let mut found = notifications
        .find_where(|n| n.user_id.as_deref() == Some(user_id) && !(unread_only && n.read))
        .await?;

    found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(found)
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(for_user(&state.collection(), &user_id, false).await?))
}

async fn unread_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(for_user(&state.collection(), &user_id, true).await?))
}

async fn unread_count_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<UnreadCount>, AppError> {
    let count = for_user(&state.collection(), &user_id, true).await?.len();

    Ok(Json(UnreadCount { count }))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut notification): Payload<Notification>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    notification.timestamp = Utc::now();
    notification.read = false;

    Ok((
        StatusCode::CREATED,
        Json(state.collection().insert(notification).await?),
    ))
}

async fn read_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    let notifications = state.collection::<Notification>();
    let mut notification = notifications
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    notification.read = true;

    Ok(Json(notifications.save(notification).await?))
}

async fn read_all_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let notifications = state.collection::<Notification>();
    let unread = for_user(&notifications, &user_id, true).await?;

    debug!("Marking {} notifications read for {user_id}", unread.len());
    for mut notification in unread {
        notification.read = true;
        notifications.save(notification).await?;
    }

    Ok(StatusCode::OK)
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<Notification>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
