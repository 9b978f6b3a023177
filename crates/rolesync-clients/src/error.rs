//! Error handling utilities for the REST adapters

use reqwest::StatusCode;
use rolesync_core::DomainError;
use serde::Deserialize;

/// Convert a transport-level reqwest error to DomainError
pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    if e.is_decode() {
        DomainError::InvalidPayload(e.to_string())
    } else {
        DomainError::Transport(e.to_string())
    }
}

/// Error body shared by both services: both send a `message`, the database
/// also sends a string `code` and the platform a numeric one.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-success response to a DomainError.
///
/// `not_found` builds the caller-specific not-found variant.
pub fn map_status_error<F>(
    service: &'static str,
    status: StatusCode,
    body: &str,
    not_found: F,
) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let object_not_found = parsed
        .code
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .is_some_and(|code| code == "object_not_found");

    match status {
        StatusCode::NOT_FOUND => not_found(),
        _ if object_not_found => not_found(),
        StatusCode::TOO_MANY_REQUESTS => DomainError::RateLimited { service },
        StatusCode::UNAUTHORIZED => DomainError::Unauthorized { service },
        _ => DomainError::Remote {
            service,
            status: status.as_u16(),
            message: parsed.message.unwrap_or_else(|| body.trim().to_string()),
        },
    }
}
