use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::WaitlistResponse;
use service::waitlist::EmailError;
use thiserror::Error;
use tracing::debug;

/// Rejections of the signup endpoint, rendered as `{"success": false, "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    #[error("Email already registered")]
    Duplicate,
    #[error("Waitlist is not accepting new signups")]
    Closed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate => StatusCode::CONFLICT,
            ApiError::Closed => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(%status, reason = %self, "signup rejected");
        (status, Json(WaitlistResponse::rejected(self.to_string()))).into_response()
    }
}
