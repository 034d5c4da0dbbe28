// API error type and its JSON response
use crate::application::settings_service::UpdateError;
use crate::domain::time_range::TimeWindowError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl From<TimeWindowError> for ApiError {
    fn from(err: TimeWindowError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::Unauthorized => ApiError::Unauthorized,
            UpdateError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            UpdateError::Save(e) => {
                tracing::error!("Error saving config: {:#}", e);
                ApiError::Internal("Failed to save config".to_string())
            }
        }
    }
}

/// Upstream and credential failures surface their message as a 500.
pub fn internal_error(err: anyhow::Error) -> ApiError {
    tracing::error!("Request failed: {:#}", err);
    ApiError::Internal(err.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
