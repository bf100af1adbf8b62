use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use models::Post;
use serde::Deserialize;
use tracing::debug;

use super::Payload;
use crate::{error::AppError, repository::Collection, state::SharedState, utils::require};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerQuery {
    user_id: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/posts", get(list_handler).post(create_handler))
        .route("/api/posts/cuisine/{cuisineType}", get(by_cuisine_handler))
        .route(
            "/api/posts/{id}",
            get(by_user_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}

async fn list_handler(State(state): State<SharedState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state
        .collection::<Post>()
        .find_where(|p| p.is_owned_by(&user_id))
        .await?;

    Ok(Json(posts))
}

async fn by_cuisine_handler(
    State(state): State<SharedState>,
    Path(cuisine_type): Path<String>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state
        .collection::<Post>()
        .find_where(|p| p.cuisine_type.as_deref() == Some(cuisine_type.as_str()))
        .await?;

    Ok(Json(posts))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(mut post): Payload<Post>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    require(&post.user_id, "userId")?;

    post.normalize_media();

    let post = state.collection().insert(post).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Loads a post the caller named in `?userId=` may modify.
async fn owned_post(
    posts: &Collection<Post>,
    post_id: &str,
    query: &OwnerQuery,
) -> Result<Post, AppError> {
    let user_id = require(&query.user_id, "userId")?;
    let post = posts.find_by_id(post_id).await?.ok_or(AppError::NotFound)?;

    if !post.is_owned_by(user_id) {
        debug!("User {user_id} does not own post {post_id}");
        return Err(AppError::Forbidden);
    }

    Ok(post)
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
    Query(query): Query<OwnerQuery>,
    Payload(update): Payload<Post>,
) -> Result<Json<Post>, AppError> {
    let posts = state.collection::<Post>();
    let mut post = owned_post(&posts, &post_id, &query).await?;

    post.apply_update(update);

    Ok(Json(posts.save(post).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(post_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    let posts = state.collection::<Post>();
    owned_post(&posts, &post_id, &query).await?;

    posts.delete_by_id(&post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
