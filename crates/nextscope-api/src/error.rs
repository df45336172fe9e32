//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The submitted URL is not an absolute http(s) URL.
    #[error("Invalid URL provided")]
    InvalidUrl(String),

    /// The analysis task panicked or was cancelled.
    #[error("Analysis failed: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            Self::InvalidUrl(details) | Self::Internal(details) => details.clone(),
        };
        let body = json!({
            "error": self.to_string(),
            "details": details,
        });
        (self.status(), Json(body)).into_response()
    }
}
