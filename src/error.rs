//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type shared by the auth
//! subsystem, the project/task repositories and the storage backends.
//! Domain code fails fast with a typed variant; the HTTP boundary turns each
//! variant into a status code and a `{"error": message}` JSON body through
//! `actix_web::error::ResponseError`.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`
//! and `bcrypt::BcryptError` keep the `?` operator usable everywhere.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Convenience alias used across services and stores.
pub type AppResult<T> = Result<T, AppError>;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed shape/length validation before reaching a service (HTTP 422).
    #[error("{0}")]
    ValidationFailed(String),

    /// A user with the given email is already registered (HTTP 409).
    #[error("User with this email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password. Both causes share this variant and
    /// message so callers cannot probe which accounts exist (HTTP 401).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No token in the auth cookie or the `Authorization` header (HTTP 401).
    #[error("No authentication token provided")]
    MissingToken,

    /// Token is malformed, mis-signed or expired (HTTP 401).
    #[error("Invalid authentication token")]
    InvalidToken,

    /// The token subject no longer resolves to a user (HTTP 401).
    #[error("User not found")]
    UserNotFound,

    /// No project with the given id (HTTP 404).
    #[error("Project {0} not found")]
    ProjectNotFound(i32),

    /// No task with the given id inside the claimed project (HTTP 404).
    #[error("Task not found in project {project_id}")]
    TaskNotFoundInProject { project_id: i32 },

    /// Status value outside `todo | in_progress | done` (HTTP 400).
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Priority value outside `low | medium | high` (HTTP 400).
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    /// Startup configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error originating from the storage layer (HTTP 500).
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::InvalidToken
            | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::ProjectNotFound(_) | AppError::TaskNotFoundInProject { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidStatus(_) | AppError::InvalidPriority(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Storage and internal details stay in the logs.
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError::Database`.
///
/// Constraint violations that carry domain meaning (unique email, task
/// foreign key) are translated by the store itself, where the offending
/// value is known.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::Database(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::Database(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationFailed`,
/// keeping the detailed field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationFailed(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}
