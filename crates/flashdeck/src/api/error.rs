//! Conversion of flashdeck errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Error;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// An error on its way out of a handler.
///
/// Carries the message used when the failure is not something the caller can
/// act on, so store internals never reach the response.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    fallback: &'static str,
}

impl ApiError {
    /// Wrap an error with the message shown for server-side failures.
    #[must_use]
    pub fn new(error: Error, fallback: &'static str) -> Self {
        Self { error, fallback }
    }

    /// Build a `map_err` adapter for one operation.
    pub fn with(fallback: &'static str) -> impl FnOnce(Error) -> Self {
        move |error| Self::new(error, fallback)
    }

    /// The status code this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.error {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.error {
            Error::Validation { message } => message.clone(),
            Error::NotFound { .. } => "Flashcard not found".to_string(),
            _ => self.fallback.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.error, "{}", self.fallback);
        }
        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::new(Error::validation("missing text"), "Failed to create");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "missing text");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::new(Error::not_found("x"), "Failed to fetch flashcard");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Flashcard not found");
    }

    #[test]
    fn test_store_error_hides_details() {
        let err = ApiError::new(
            Error::DatabaseMigration {
                message: "secret internals".to_string(),
            },
            "Failed to fetch flashcards",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to fetch flashcards");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::new(Error::internal("boom"), "Failed").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
