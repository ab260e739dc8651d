use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::db::StoreError;

/// Errors surfaced by request handlers. Every variant renders as
/// `{"error": "<message>"}` with a matching status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Storage(&'static str),

    #[error("{0}")]
    Unavailable(&'static str),
}

impl ApiError {
    /// Logs the storage failure in full and keeps only a generic message for the client.
    pub fn storage(message: &'static str, err: StoreError) -> Self {
        log::error!("{}: {}", message, err);
        ApiError::Storage(message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
