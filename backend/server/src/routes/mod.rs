//! # Routes
//!
//! One module per resource, each returning its own `Router` with full paths.
//!
//! ## Access
//! - Protected: everything under `/api` except the routes below, behind [`require_auth`]
//! - Public: `/api/auth/**`, `/oauth2/**`, `/login/oauth2/**`,
//!   `GET /api/users/exists/{username}`, `GET /api/uploads/{filename}`, `GET /health`
//!
//! Protected routes share one path namespace per resource, so a path segment that
//! means `userId` for `GET` and `id` for `PUT` is the same `{id}` capture.
use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    middleware::from_fn_with_state,
};
use serde::de::DeserializeOwned;

use crate::{auth::require_auth, error::AppError, state::SharedState};

mod auth;
mod bookmarks;
mod comments;
mod connections;
mod group_posts;
mod groups;
mod health;
mod likes;
mod meal_plans;
mod media;
mod notifications;
mod posts;
mod profiles;
mod skill_shares;
mod status_updates;
mod uploads;
mod users;

pub fn router(state: &SharedState) -> Router<SharedState> {
    let protected = Router::new()
        .merge(users::routes())
        .merge(profiles::routes())
        .merge(posts::routes())
        .merge(comments::routes())
        .merge(likes::routes())
        .merge(media::routes())
        .merge(bookmarks::routes())
        .merge(groups::routes())
        .merge(group_posts::routes())
        .merge(meal_plans::routes())
        .merge(skill_shares::routes())
        .merge(status_updates::routes())
        .merge(notifications::routes())
        .merge(connections::routes())
        .merge(uploads::routes(state.config.max_upload_bytes))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(protected)
        .merge(auth::routes())
        .merge(users::public_routes())
        .merge(uploads::public_routes())
        .merge(health::routes())
}

/// JSON body whose rejections come back as `AppError::MalformedPayload`.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))?;

        Ok(Self(value))
    }
}

fn saved_id(id: Option<String>) -> Result<String, AppError> {
    id.ok_or_else(|| AppError::Internal("saved document has no id".to_string()))
}
