//! The error value carried through the continuation.

use axum::http::StatusCode;
use thiserror::Error;

/// Boxed error usable as the source of a [`HandlerError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error passed along the chain by `next.fail(..)`.
///
/// The dispatcher treats it as opaque: it only decides which handlers still
/// participate. By convention it carries a message and, optionally, the HTTP
/// status a recovery handler or the terminal should answer with.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    status: Option<StatusCode>,
    #[source]
    source: Option<BoxError>,
}

impl HandlerError {
    /// Create an error with the given message and no status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Wrap an arbitrary error, reusing its display text as the message.
    pub fn from_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            message: source.to_string(),
            status: None,
            source: Some(source),
        }
    }

    /// Attach the HTTP status this error should be answered with.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The status explicitly attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The status to respond with.
    ///
    /// Only client and server error statuses are honoured; anything else
    /// (including no status at all) maps to 500.
    pub fn status_code(&self) -> StatusCode {
        match self.status {
            Some(status) if status.is_client_error() || status.is_server_error() => status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        Self::from_source(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_source(err).with_status(StatusCode::BAD_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_defaults_to_500() {
        let err = HandlerError::new("boom");
        assert_eq!(err.status(), None);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_code_honours_error_statuses() {
        let err =
            HandlerError::new("Method Not Allowed").with_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);

        // A success status on an error makes no sense to send back.
        let err = HandlerError::new("odd").with_status(StatusCode::OK);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_source_keeps_message_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = HandlerError::from(io);
        assert_eq!(err.message(), "disk on fire");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "disk on fire");
    }
}
