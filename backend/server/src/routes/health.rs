use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    store: &'static str,
}

pub fn routes() -> Router<SharedState> {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        store: state.store.backend_tag(),
    })
}
