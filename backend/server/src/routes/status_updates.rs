use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use models::StatusUpdate;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/workoutStatusUpdates",
            get(list_handler).post(create_handler),
        )
        .route(
            "/api/workoutStatusUpdates/{id}",
            get(by_user_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}

async fn list_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<StatusUpdate>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<StatusUpdate>>, AppError> {
    let updates = state
        .collection::<StatusUpdate>()
        .find_where(|u| u.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(updates))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(update): Payload<StatusUpdate>,
) -> Result<(StatusCode, Json<StatusUpdate>), AppError> {
    Ok((StatusCode::CREATED, Json(state.collection().insert(update).await?)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(edit): Payload<StatusUpdate>,
) -> Result<Json<StatusUpdate>, AppError> {
    let updates = state.collection::<StatusUpdate>();
    let mut update = updates.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    update.apply_update(edit);

    Ok(Json(updates.save(update).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<StatusUpdate>().delete_by_id(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
