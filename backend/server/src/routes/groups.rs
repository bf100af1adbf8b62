use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use models::Group;

use super::Payload;
use crate::{error::AppError, state::SharedState, utils::require};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/groups", get(list_handler).post(create_handler))
        .route("/api/groups/public", get(public_handler))
        .route("/api/groups/creator/{userId}", get(by_creator_handler))
        .route("/api/groups/member/{userId}", get(by_member_handler))
        .route(
            "/api/groups/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/api/groups/{id}/members", put(members_handler))
        .route("/api/groups/{id}/admins", put(admins_handler))
}

async fn list_handler(State(state): State<SharedState>) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn public_handler(State(state): State<SharedState>) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(state.collection::<Group>().find_where(|g| g.is_public).await?))
}

async fn by_creator_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = state
        .collection::<Group>()
        .find_where(|g| g.creator_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(groups))
}

async fn by_member_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = state
        .collection::<Group>()
        .find_where(|g| g.has_member(&user_id))
        .await?;

    Ok(Json(groups))
}

async fn get_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, AppError> {
    state
        .collection()
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut group): Payload<Group>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    require(&group.creator_id, "creatorId")?;

    group.created_at = Utc::now();
    group.retain_creator();

    Ok((StatusCode::CREATED, Json(state.collection().insert(group).await?)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(update): Payload<Group>,
) -> Result<Json<Group>, AppError> {
    let groups = state.collection::<Group>();
    let mut group = groups.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    group.apply_update(update);

    Ok(Json(groups.save(group).await?))
}

/// Replaces the member list. The creator always stays a member.
async fn members_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(member_ids): Payload<Vec<String>>,
) -> Result<Json<Group>, AppError> {
    let groups = state.collection::<Group>();
    let mut group = groups.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    group.member_ids = member_ids;
    group.retain_creator_as_member();

    Ok(Json(groups.save(group).await?))
}

async fn admins_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(admin_ids): Payload<Vec<String>>,
) -> Result<Json<Group>, AppError> {
    let groups = state.collection::<Group>();
    let mut group = groups.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    group.admin_ids = admin_ids;
    group.retain_creator_as_admin();

    Ok(Json(groups.save(group).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<Group>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
