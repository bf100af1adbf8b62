use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use models::{Comment, Post, User};
use serde::Deserialize;

use super::Payload;
use crate::{error::AppError, state::SharedState, utils::require};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentEdit {
    #[serde(default)]
    comment_text: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/comments/post/{postId}", get(by_post_handler))
        .route(
            "/api/comments/{id}",
            post(create_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
    Payload(mut comment): Payload<Comment>,
) -> Result<Json<Comment>, AppError> {
    let user_id = require(&comment.user_id, "userId")?;

    if !state.collection::<Post>().exists_by_id(&post_id).await?
        || !state.collection::<User>().exists_by_id(user_id).await?
    {
        return Err(AppError::NotFound);
    }

    comment.post_id = Some(post_id);

    Ok(Json(state.collection().insert(comment).await?))
}

async fn by_post_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    if !state.collection::<Post>().exists_by_id(&post_id).await? {
        return Err(AppError::NotFound);
    }

    let comments = state
        .collection::<Comment>()
        .find_where(|c| c.post_id.as_deref() == Some(post_id.as_str()))
        .await?;

    Ok(Json(comments))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(edit): Payload<CommentEdit>,
) -> Result<Json<Comment>, AppError> {
    let comments = state.collection::<Comment>();
    let mut comment = comments.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    comment.comment_text = edit.comment_text;

    Ok(Json(comments.save(comment).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<Comment>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
