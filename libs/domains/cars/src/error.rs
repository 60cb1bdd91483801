use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CarError {
    #[error("Car not found: {0}")]
    NotFound(Uuid),

    /// The car exists but belongs to a different owner. Surfaced to clients
    /// exactly like [`CarError::NotFound`] so that ownership probing cannot
    /// reveal whether a listing exists.
    #[error("Car not found: {0}")]
    NotOwned(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Image storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CarResult<T> = Result<T, CarError>;

/// Convert CarError to AppError for standardized error responses
impl From<CarError> for AppError {
    fn from(err: CarError) -> Self {
        match err {
            CarError::NotFound(id) | CarError::NotOwned(id) => {
                AppError::NotFound(format!("Car {} not found", id))
            }
            CarError::Validation(msg) => AppError::BadRequest(msg),
            CarError::Storage(msg) => AppError::InternalServerError(msg),
            CarError::Database(msg) => AppError::InternalServerError(msg),
            CarError::Config(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CarError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CarError {
    fn from(err: mongodb::error::Error) -> Self {
        CarError::Database(err.to_string())
    }
}

impl From<reqwest::Error> for CarError {
    fn from(err: reqwest::Error) -> Self {
        CarError::Storage(err.to_string())
    }
}
