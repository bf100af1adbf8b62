use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use models::Like;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/likes", post(create_handler))
        .route("/api/likes/{id}", get(by_post_handler).delete(delete_handler))
}

async fn by_post_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Like>>, AppError> {
    let likes = state
        .collection::<Like>()
        .find_where(|l| l.post_id.as_deref() == Some(post_id.as_str()))
        .await?;

    Ok(Json(likes))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(like): Payload<Like>,
) -> Result<(StatusCode, Json<Like>), AppError> {
    let like = state.collection().insert(like).await?;

    Ok((StatusCode::CREATED, Json(like)))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<Like>().delete_by_id(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
