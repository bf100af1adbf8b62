use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{database::StoreError, token::TokenError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required field {0}")]
    MissingField(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not permitted")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Upload failed: {0}")]
    Upload(#[from] std::io::Error),

    #[error("OAuth provider error: {0}")]
    OAuth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::OAuth(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Upload(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match status {
            StatusCode::BAD_GATEWAY => {
                warn!("{self}");
                "Sign-in provider unavailable".to_string()
            }
            status if status.is_server_error() => {
                error!("{self}");
                "An unexpected error occurred. Please try again later.".to_string()
            }
            _ => self.to_string(),
        };

        (status, format!("Error: {message}")).into_response()
    }
}
