use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use models::UserProfile;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/userProfiles", get(list_handler).post(create_handler))
        .route("/api/userProfiles/user/{userId}", get(by_user_handler))
        .route(
            "/api/userProfiles/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(profile): Payload<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.collection().insert(profile).await?))
}

async fn list_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn get_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    state
        .collection()
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let profiles = state
        .collection::<UserProfile>()
        .find_where(|p| p.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(profiles))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(update): Payload<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    let profiles = state.collection::<UserProfile>();
    let mut profile = profiles.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    profile.apply_update(update);

    Ok(Json(profiles.save(profile).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<UserProfile>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
