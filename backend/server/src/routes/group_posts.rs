use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::Utc;
use models::GroupPost;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/group-posts", post(create_handler))
        .route("/api/group-posts/group/{groupId}", get(by_group_handler))
        .route("/api/group-posts/{id}", put(update_handler).delete(delete_handler))
}

/// Newest first.
async fn by_group_handler(
    State(state): State<SharedState>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupPost>>, AppError> {
    let mut posts = state
        .collection::<GroupPost>()
        .find_where(|p| p.group_id.as_deref() == Some(group_id.as_str()))
        .await?;

    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(Json(posts))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut post): Payload<GroupPost>,
) -> Result<(StatusCode, Json<GroupPost>), AppError> {
    post.timestamp = Utc::now();

    Ok((StatusCode::CREATED, Json(state.collection().insert(post).await?)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(update): Payload<GroupPost>,
) -> Result<Json<GroupPost>, AppError> {
    let posts = state.collection::<GroupPost>();
    let mut post = posts.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    post.apply_update(update);

    Ok(Json(posts.save(post).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<GroupPost>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
