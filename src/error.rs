//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to produce the `{"ERROR": ...}` body shape
//! that every failing endpoint returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::state::RegistryError;

/// Application-level error types
///
/// Each variant corresponds to one failure kind an endpoint can produce and
/// carries the exact message the client sees.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required JSON body field was absent
    #[error("{0}")]
    MissingFields(&'static str),

    /// The acting user (path segment) is not registered
    #[error("Unregistered user")]
    UserNotFound,

    /// The referenced film is not in the registry
    #[error("This film does not exist")]
    FilmNotFound,

    /// Registration attempted with a username that is already taken
    #[error("User with the same name already exist, please choose another name")]
    UserAlreadyExists,

    /// Film creation attempted with a (name, year) pair that already exists
    ///
    /// Reported with status 200 and an ERROR body, matching the surface
    /// contract for repeated film creation.
    #[error("This film already exist")]
    FilmAlreadyExists,

    /// A mark outside the inclusive [0, 10] range was submitted
    #[error("Mark must be between 0 and 10, check it")]
    InvalidMark,

    /// A path segment or body field that must be numeric was not
    #[error("{0}")]
    InvalidNumericInput(&'static str),

    /// Basic-auth credentials were missing or wrong
    #[error("Unauthorized access")]
    Unauthorized,

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UserExists => AppError::UserAlreadyExists,
            RegistryError::FilmExists => AppError::FilmAlreadyExists,
            RegistryError::FilmNotFound => AppError::FilmNotFound,
            RegistryError::MarkOutOfRange => AppError::InvalidMark,
        }
    }
}

impl AppError {
    /// HTTP status for this error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::FilmNotFound => StatusCode::NOT_FOUND,
            AppError::UserAlreadyExists => StatusCode::BAD_REQUEST,
            // Repeated film creation answers 200 with an ERROR body.
            AppError::FilmAlreadyExists => StatusCode::OK,
            AppError::InvalidMark => StatusCode::NOT_FOUND,
            AppError::InvalidNumericInput(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "ERROR": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingFields("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::FilmNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UserAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::FilmAlreadyExists.status_code(), StatusCode::OK);
        assert_eq!(AppError::InvalidMark.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_registry_error_conversion() {
        assert!(matches!(
            AppError::from(RegistryError::UserExists),
            AppError::UserAlreadyExists
        ));
        assert!(matches!(
            AppError::from(RegistryError::FilmExists),
            AppError::FilmAlreadyExists
        ));
        assert!(matches!(
            AppError::from(RegistryError::FilmNotFound),
            AppError::FilmNotFound
        ));
        assert!(matches!(
            AppError::from(RegistryError::MarkOutOfRange),
            AppError::InvalidMark
        ));
    }

    #[test]
    fn test_film_not_found_message() {
        assert_eq!(
            AppError::FilmNotFound.to_string(),
            "This film does not exist"
        );
    }
}
