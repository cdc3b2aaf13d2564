//! Errors that end an export request

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::fetch::NetworkError;

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (including https://)";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{0}")]
    Validation(String),

    #[error("Network or access error: {0}")]
    Network(#[from] NetworkError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Validation(_) => "VALIDATION_ERROR",
            ExportError::Network(_) => "NETWORK_ERROR",
            ExportError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ExportError::Validation(_) => StatusCode::BAD_REQUEST,
            ExportError::Network(_) => StatusCode::BAD_GATEWAY,
            ExportError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}
