//! HTTP error mapping
//!
//! Authorization failures become 401, validation failures 400 with their
//! message, and everything else 500 with a generic body. Store and internal
//! details never reach the caller.

use crate::domain::{EngineError, ErrorKind, StageError};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A failed export, ready to be rendered as a response
#[derive(Debug)]
pub struct ApiError(pub StageError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Authorization => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DataAccess | ErrorKind::Internal | ErrorKind::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StageError> for ApiError {
    fn from(error: StageError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0.error {
            EngineError::Validation { field, message } => {
                json!({ "error": "invalid_request", "field": field, "message": message })
            }
            EngineError::Authorization(_) => json!({ "error": "unauthorized" }),
            _ => json!({ "error": "export_failed", "message": "The export could not be completed" }),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
