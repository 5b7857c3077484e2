//! Classify HTTP status codes and call failures into retry policy error kinds.

use crate::error::ApiError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u16) -> ErrorKind {
    match code {
        400..=499 => ErrorKind::ClientFault(code),
        500..=599 => ErrorKind::ServerFault(code),
        _ => ErrorKind::Other,
    }
}

/// Classify a failed call. Only plain HTTP responses carry a retryable status;
/// auth, transport and decode failures fall through to `Other`.
pub fn classify(e: &ApiError) -> ErrorKind {
    match e {
        ApiError::Http { status, .. } => classify_http_status(*status),
        ApiError::Auth { .. } | ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Url(_) => {
            ErrorKind::Other
        }
    }
}
