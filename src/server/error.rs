//! Mapping of analytics errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AnalyticsError;

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wrapper so handlers can return `Result<_, ApiError>` and use `?`.
#[derive(Debug)]
pub struct ApiError(pub AnalyticsError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            AnalyticsError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalyticsError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AnalyticsError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
