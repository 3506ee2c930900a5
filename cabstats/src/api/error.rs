//! HTTP error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wraps a library error for an HTTP handler
#[derive(Debug)]
pub struct ApiError(pub crate::Error);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    reason: String,
    status: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.0.kind();

        if status.is_server_error() {
            tracing::error!("Aggregation failed: {}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }
        metrics::counter!("cabstats_query_errors_total", "kind" => kind).increment(1);

        let body = ErrorBody {
            error: kind,
            reason: self.0.to_string(),
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}
