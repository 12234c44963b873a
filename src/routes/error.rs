use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::domain::{LinkError, OrderingError, ProfileError, UsernameError};
use crate::error_chain_fmt;

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// The client's view of a link list no longer matches the stored one.
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error("Something went wrong")]
    Unexpected(#[from] anyhow::Error),
}

// Same logic to get the full error chain on `Debug`
impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<UsernameError> for ApiError {
    fn from(e: UsernameError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<LinkError> for ApiError {
    fn from(e: LinkError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Ordering(_) => {
                StatusCode::CONFLICT
            }
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            ApiError::Unexpected(_) => tracing::error!("{:?}", self),
            ApiError::Ordering(_) => tracing::warn!("{:?}", self),
            _ => tracing::info!("Request rejected: {}", self),
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
