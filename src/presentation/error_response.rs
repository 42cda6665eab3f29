// Mapping of service errors to HTTP responses
use crate::application::error::StatsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Body of every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl StatsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for StatsError {
    /// Only the display message reaches the client; upstream detail stays in the logs.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
