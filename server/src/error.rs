//! Handler errors and their HTTP rendering.
//!
//! Every variant renders as `{"error": "<message>"}`. Upstream messages are
//! passed through verbatim so callers see what the store or the generation
//! service actually said.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;
use crate::upstream::UpstreamError;

pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Body of every non-success response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or a value cannot be parsed.
    #[error("{0}")]
    Validation(String),

    /// The request is well formed but not allowed in the record's state.
    #[error("{0}")]
    BusinessRule(String),

    #[error("Todo not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Generation(UpstreamError),

    #[error("{0}")]
    Notification(UpstreamError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Generation(_) | AppError::Notification(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}
