use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a request can end with. The variant decides the status code;
/// handlers never pick status codes for errors themselves.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input
    #[error("{message}")]
    Validation { message: String },

    /// Referenced event does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// Capacity exhausted, duplicate booking, or a lost write race
    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict { message: message.into() }
    }

    pub fn event_not_found(event_id: i64) -> Self {
        Self::not_found(format!("Event with ID {} not found", event_id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Name reported in `error.type`.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "ValidationError",
            AppError::NotFound { .. } => "NotFoundError",
            AppError::Conflict { .. } => "ConflictError",
            AppError::Database(_) | AppError::Internal(_) => "InternalError",
        }
    }

    /// Message safe to hand to callers. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message } => message.clone(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        ErrorBody {
            success: false,
            error: ErrorDetail {
                message: err.user_message(),
                kind: err.kind(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(e) => tracing::error!("Internal error: {:#}", e),
            AppError::Conflict { .. } => tracing::warn!("Conflict: {}", self),
            AppError::Validation { .. } | AppError::NotFound { .. } => {
                tracing::debug!("Client error: {}", self)
            }
        }

        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
