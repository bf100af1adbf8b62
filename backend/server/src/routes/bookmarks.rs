use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::Utc;
use models::Bookmark;
use serde::Deserialize;

use super::Payload;
use crate::{error::AppError, state::SharedState, utils::require};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckQuery {
    user_id: Option<String>,
    resource_id: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/bookmarks", post(create_handler))
        .route("/api/bookmarks/check", get(check_handler))
        .route("/api/bookmarks/resource/{resourceId}", get(by_resource_handler))
        .route("/api/bookmarks/tags/{tag}", get(by_tag_handler))
        .route(
            "/api/bookmarks/user/{userId}/resource/{resourceId}",
            delete(delete_for_resource_handler),
        )
        .route(
            "/api/bookmarks/{id}",
            get(by_user_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = state
        .collection::<Bookmark>()
        .find_where(|b| b.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(bookmarks))
}

async fn by_resource_handler(
    State(state): State<SharedState>,
    Path(resource_id): Path<String>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = state
        .collection::<Bookmark>()
        .find_where(|b| b.resource_id.as_deref() == Some(resource_id.as_str()))
        .await?;

    Ok(Json(bookmarks))
}

async fn by_tag_handler(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = state
        .collection::<Bookmark>()
        .find_where(|b| b.has_tag(&tag))
        .await?;

    Ok(Json(bookmarks))
}

/// One bookmark per user and resource.
async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut bookmark): Payload<Bookmark>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let user_id = require(&bookmark.user_id, "userId")?.to_string();
    let resource_id = require(&bookmark.resource_id, "resourceId")?.to_string();

    let bookmarks = state.collection::<Bookmark>();
    if bookmarks
        .exists_where(|b| b.matches(&user_id, &resource_id))
        .await?
    {
        return Err(AppError::Conflict(format!(
            "Resource {resource_id} is already bookmarked"
        )));
    }

    bookmark.created_at = Utc::now();

    Ok((StatusCode::CREATED, Json(bookmarks.insert(bookmark).await?)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(update): Payload<Bookmark>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmarks = state.collection::<Bookmark>();
    let mut bookmark = bookmarks.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    bookmark.apply_update(update);

    Ok(Json(bookmarks.save(bookmark).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.collection::<Bookmark>().delete_by_id(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}

async fn delete_for_resource_handler(
    State(state): State<SharedState>,
    Path((user_id, resource_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let bookmarks = state.collection::<Bookmark>();

    let id = bookmarks
        .find_one_where(|b| b.matches(&user_id, &resource_id))
        .await?
        .and_then(|b| b.id)
        .ok_or(AppError::NotFound)?;

    bookmarks.delete_by_id(&id).await?;

    Ok(StatusCode::OK)
}

async fn check_handler(
    State(state): State<SharedState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<bool>, AppError> {
    let user_id = require(&query.user_id, "userId")?;
    let resource_id = require(&query.resource_id, "resourceId")?;

    let exists = state
        .collection::<Bookmark>()
        .exists_where(|b| b.matches(user_id, resource_id))
        .await?;

    Ok(Json(exists))
}
