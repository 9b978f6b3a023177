//! Service layer error types
//!
//! Provides a unified error type for all reconciliation operations.

use rolesync_common::AppError;
use rolesync_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain or remote failure
    Domain(DomainError),

    /// Application error (configuration, etc.)
    App(AppError),

    /// The bot's own member holds no role known to the snapshot
    BotHasNoRoles,

    /// A full sweep is already running
    SweepInProgress,

    /// The technical-lead pattern is not a valid regular expression
    InvalidPattern(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::BotHasNoRoles => write!(f, "Bot member holds no known roles"),
            Self::SweepInProgress => write!(f, "A full sweep is already running"),
            Self::InvalidPattern(msg) => write!(f, "Invalid technical-lead pattern: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Check if this wraps a not-found domain error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    /// HTTP status code for a domain error
    pub fn domain_status(e: &DomainError) -> u16 {
        if e.is_not_found() {
            404
        } else if e.is_schema() {
            422
        } else if e.is_remote() {
            502
        } else {
            500
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => Self::domain_status(e),
            Self::App(e) => e.status_code(),
            Self::SweepInProgress => 409,
            Self::BotHasNoRoles | Self::InvalidPattern(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::BotHasNoRoles => "BOT_HAS_NO_ROLES",
            Self::SweepInProgress => "SWEEP_IN_PROGRESS",
            Self::InvalidPattern(_) => "INVALID_PATTERN",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::SweepInProgress => AppError::Conflict(message),
            ServiceError::InvalidPattern(_) => AppError::Config(message),
            ServiceError::BotHasNoRoles => AppError::Internal(anyhow::anyhow!(message)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
