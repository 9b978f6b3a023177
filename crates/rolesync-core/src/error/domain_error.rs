//! Domain errors - error types for the domain layer and its collaborator ports

use thiserror::Error;

use crate::value_objects::{PageId, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Property not found: {property_id} on page {page_id}")]
    PropertyNotFound { page_id: PageId, property_id: String },

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    // =========================================================================
    // Schema Errors
    // =========================================================================
    #[error("Missing property: {0}")]
    MissingProperty(String),

    #[error("Property '{name}' has type {found}, expected {expected}")]
    PropertyTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Malformed property: {0}")]
    MalformedProperty(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    #[error("Rate limited by {service}")]
    RateLimited { service: &'static str },

    #[error("Unauthorized request to {service}")]
    Unauthorized { service: &'static str },

    #[error("{service} returned {status}: {message}")]
    Remote {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PageNotFound(_) => "UNKNOWN_PAGE",
            Self::PropertyNotFound { .. } => "UNKNOWN_PROPERTY",
            Self::DatabaseNotFound(_) => "UNKNOWN_DATABASE",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",

            // Schema
            Self::MissingProperty(_) => "MISSING_PROPERTY",
            Self::PropertyTypeMismatch { .. } => "PROPERTY_TYPE_MISMATCH",
            Self::MalformedProperty(_) => "MALFORMED_PROPERTY",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",

            // Remote
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PageNotFound(_)
                | Self::PropertyNotFound { .. }
                | Self::DatabaseNotFound(_)
                | Self::GuildNotFound(_)
                | Self::MemberNotFound(_)
                | Self::RoleNotFound(_)
        )
    }

    /// Check if this is a schema or payload shape error
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingProperty(_)
                | Self::PropertyTypeMismatch { .. }
                | Self::MalformedProperty(_)
                | Self::InvalidPayload(_)
        )
    }

    /// Check if this error came from a remote service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Unauthorized { .. }
                | Self::Remote { .. }
                | Self::Transport(_)
        )
    }
}
