//! Domain errors

use thiserror::Error;
use uuid::Uuid;

use crate::domain::ReadingStatus;

/// Coarse classification used for logging levels and HTTP mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputInvalid,
    NotFound,
    Unauthorized,
    Conflict,
    StoreFailure,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session points at missing user: {0}")]
    StaleSession(Uuid),

    #[error("User {0} has no hotel assigned")]
    NoHotelAssigned(String),

    #[error("{field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Reading {0} is readonly")]
    ReadonlyReading(String),

    #[error("Status cannot move from {from} back to {to}")]
    StatusRegression { from: ReadingStatus, to: ReadingStatus },

    #[error("Reading status changed concurrently: expected {expected}, found {actual}")]
    StatusChanged { expected: ReadingStatus, actual: ReadingStatus },

    #[error("Reading not found: {0}")]
    ReadingNotFound(String),

    #[error("Reference id already exists: {0}")]
    DuplicateReference(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::MissingCredentials
            | DomainError::NoHotelAssigned(_)
            | DomainError::ValidationFailed { .. }
            | DomainError::InvalidStatus(_) => ErrorKind::InputInvalid,
            DomainError::UserNotFound
            | DomainError::StaleSession(_)
            | DomainError::ReadingNotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidCredentials
            | DomainError::Unauthorized(_)
            | DomainError::ReadonlyReading(_)
            | DomainError::StatusRegression { .. } => ErrorKind::Unauthorized,
            DomainError::DuplicateReference(_) | DomainError::StatusChanged { .. } => {
                ErrorKind::Conflict
            }
            DomainError::DatabaseError(_) | DomainError::InternalError(_) => {
                ErrorKind::StoreFailure
            }
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        DomainError::ValidationFailed {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
