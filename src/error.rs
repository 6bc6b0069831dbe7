use axum::http::StatusCode;
use thiserror::Error;

/// Failure modes of the appointment store and its collaborators.
///
/// `NotFound` on delete is treated as success by callers (idempotent
/// removal); every other variant surfaces as a user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Rejected locally before any store call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The authorization policy rejected the operation. This signals a
    /// configuration problem, not a transient fault; never retried.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The slot is already taken for that date.
    #[error("Slot already booked: {0}")]
    Conflict(String),

    /// The record does not exist.
    #[error("Record not found")]
    NotFound,

    /// Network or backend failure; the user may retry.
    #[error("Store unreachable: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => StoreError::NotFound,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            Error::DatabaseError(_, info) if info.message().contains("permission denied") => {
                StoreError::PermissionDenied(info.message().to_string())
            }
            other => StoreError::Transport(other.to_string()),
        }
    }
}
