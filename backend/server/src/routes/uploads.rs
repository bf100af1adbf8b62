use std::io::ErrorKind;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppError,
    state::SharedState,
    utils::{content_type_for, file_extension, is_safe_filename},
};

const CACHE_FOREVER: &str = "max-age=31536000";

#[derive(Serialize)]
struct Uploaded {
    url: String,
    #[serde(rename = "type")]
    content_type: String,
}

pub fn routes(max_upload_bytes: usize) -> Router<SharedState> {
    Router::new().route(
        "/api/upload",
        post(upload_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

pub fn public_routes() -> Router<SharedState> {
    Router::new().route("/api/uploads/{filename}", get(serve_handler))
}

/// Stores the `file` part under a fresh name and answers with its public URL.
async fn upload_handler(
    State(state): State<SharedState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedPayload(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let declared_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::MalformedPayload(e.body_text()))?;

        let filename = format!(
            "{}{}",
            Uuid::new_v4(),
            file_extension(&original_name).unwrap_or_default()
        );

        fs::create_dir_all(&state.config.upload_dir).await?;
        fs::write(state.config.upload_dir.join(&filename), &bytes).await?;

        info!(
            "Stored upload {original_name:?} from {} as {filename} ({} bytes)",
            user.id,
            bytes.len()
        );

        return Ok(Json(Uploaded {
            url: state.config.upload_url(&filename),
            content_type: declared_type
                .unwrap_or_else(|| content_type_for(&filename).to_string()),
        }));
    }

    Err(AppError::MissingField("file"))
}

async fn serve_handler(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_safe_filename(&filename) {
        return Err(AppError::MalformedPayload(format!(
            "invalid file name {filename:?}"
        )));
    }

    let bytes = match fs::read(state.config.upload_dir.join(&filename)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Upload {filename} not found");
            return Err(AppError::NotFound);
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [
            (CONTENT_TYPE, content_type_for(&filename).to_string()),
            (CONTENT_DISPOSITION, format!("inline; filename=\"{filename}\"")),
            (CACHE_CONTROL, CACHE_FOREVER.to_string()),
        ],
        bytes,
    ))
}
