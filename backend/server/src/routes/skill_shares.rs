use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use models::SkillShare;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/SkillShares", get(list_handler).post(create_handler))
        .route(
            "/api/SkillShares/{id}",
            get(by_user_handler)
                .put(replace_handler)
                .delete(delete_handler),
        )
}

async fn list_handler(State(state): State<SharedState>) -> Result<Json<Vec<SkillShare>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SkillShare>>, AppError> {
    let shares = state
        .collection::<SkillShare>()
        .find_where(|s| s.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(shares))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(share): Payload<SkillShare>,
) -> Result<(StatusCode, Json<SkillShare>), AppError> {
    Ok((StatusCode::CREATED, Json(state.collection().insert(share).await?)))
}

/// Whole-document replacement under the path id.
async fn replace_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(mut share): Payload<SkillShare>,
) -> Result<Json<SkillShare>, AppError> {
    let shares = state.collection::<SkillShare>();
    if !shares.exists_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    share.id = Some(id);

    Ok(Json(shares.save(share).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<SkillShare>().delete_by_id(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
