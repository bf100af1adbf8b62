use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use models::MealPlan;

use super::Payload;
use crate::{error::AppError, state::SharedState};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/MealPlans", get(list_handler).post(create_handler))
        .route(
            "/api/MealPlans/{id}",
            get(by_user_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}

async fn list_handler(State(state): State<SharedState>) -> Result<Json<Vec<MealPlan>>, AppError> {
    Ok(Json(state.collection().find_all().await?))
}

async fn by_user_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MealPlan>>, AppError> {
    let plans = state
        .collection::<MealPlan>()
        .find_where(|p| p.user_id.as_deref() == Some(user_id.as_str()))
        .await?;

    Ok(Json(plans))
}

async fn create_handler(
    State(state): State<SharedState>,
    Payload(plan): Payload<MealPlan>,
) -> Result<(StatusCode, Json<MealPlan>), AppError> {
    Ok((StatusCode::CREATED, Json(state.collection().insert(plan).await?)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(update): Payload<MealPlan>,
) -> Result<Json<MealPlan>, AppError> {
    let plans = state.collection::<MealPlan>();
    let mut plan = plans.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    plan.apply_update(update);

    Ok(Json(plans.save(plan).await?))
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.collection::<MealPlan>().delete_by_id(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
