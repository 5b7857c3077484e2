//! Error type shared by the REST transport, the OAuth exchange and the service clients.

use thiserror::Error;

/// Failure of a single remote call.
///
/// `Http` carries the observed status and response body so the retry loop can
/// classify it and callers can log it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// OAuth token exchange failed. Never retried.
    #[error("access token request failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },
    /// Curl reported an error before a status was available (connect, DNS, timeout).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// Response body was not the JSON we expected.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    /// Base URL or path could not be turned into a request URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Status code of the response, when the failure got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Auth { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Url(_) => None,
        }
    }

    /// Response body, when one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } | ApiError::Auth { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Http { status: 400..=499, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_status_and_body() {
        let e = ApiError::Http {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(e.status(), Some(503));
        assert_eq!(e.body(), Some("busy"));
        assert_eq!(e.to_string(), "HTTP 503: busy");
        assert!(!e.is_client_error());
    }

    #[test]
    fn not_found_is_client_error() {
        let e = ApiError::Http {
            status: 404,
            body: String::new(),
        };
        assert!(e.is_not_found());
        assert!(e.is_client_error());
    }

    #[test]
    fn decode_error_has_no_status() {
        let e: ApiError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(e.status(), None);
        assert!(e.body().is_none());
    }
}
