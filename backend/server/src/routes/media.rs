use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use models::Media;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/media", post(create_handler))
        .route("/api/media/{id}", get(by_post_handler).delete(delete_handler))
}

async fn by_post_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Media>>, AppError> {
    let media = state
        .collection::<Media>()
        .find_where(|m| m.post_id.as_deref() == Some(post_id.as_str()))
        .await?;

    Ok(Json(media))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(media): Payload<Media>,
) -> Result<(StatusCode, Json<Media>), AppError> {
    Ok((StatusCode::CREATED, Json(state.collection().insert(media).await?)))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<Media>().delete_by_id(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
