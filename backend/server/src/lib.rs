//! HTTP API of the PAF social platform: recipes, groups, plans and the people sharing them.
//!
//!
//!
//! # General Infrastructure
//! - Axum server, one task per request
//! - Every resource is a collection of JSON documents in the document store
//! - Redis in deployment, an in-memory store for local runs and tests (`STORE_BACKEND=memory`)
//! - Uploaded media lives on disk under `UPLOAD_DIR` and is served back by the API
//!
//!
//!
//! # Authentication
//!
//! **Goal**: every `/api` route except sign-in and a few lookups needs a caller identity.
//!
//! - Username/password accounts, passwords hashed with bcrypt
//! - Sign-in hands out an access token (minutes) and a refresh token (days), both HS256 JWTs
//! - Access and refresh tokens are signed with different secrets, so one never passes for the other
//! - `/api/auth/token` trades a refresh token for a fresh access token
//! - The refresh token is only replaced once it is within a week of expiring
//! - Google sign-in finds or creates the account by email, then redirects to the frontend with both tokens
//!
//!
//!
//! # Notes
//!
//! ## Document store
//! Each collection is one redis hash, `<namespace>:<collection>`, keyed by document id. Queries
//! other than by-id scan the hash and filter in the server. Collections here are small and
//! per-user, so the scan is cheaper than maintaining secondary indexes.
//!
//! Ids are uuid v7, so listing a hash in key order lists documents in creation order.
//!
//!
//!
//! # Setup
//!
//! Run locally without redis.
//! ```sh
//! STORE_BACKEND=memory JWT_ACCESS_SECRET=dev JWT_REFRESH_SECRET=dev-refresh cargo run
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::Method,
    middleware::from_fn,
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod oauth;
pub mod repository;
pub mod routes;
pub mod state;
pub mod token;
pub mod utils;

use config::{Config, ConfigError};
use state::{AppState, SharedState};

pub fn build_router(state: SharedState) -> Result<Router, ConfigError> {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    Ok(routes::router(&state)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::request_tracing))
        .layer(cors)
        .with_state(state))
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load().context("Failed to load config")?;

    info!("Initializing state...");
    let state = AppState::new(config)
        .await
        .context("Failed to connect to the document store")?;

    info!("Starting server...");
    let app = build_router(state.clone())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
