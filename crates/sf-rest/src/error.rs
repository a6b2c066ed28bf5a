//! Error types for restforce-rest.
//!
//! Only [`ErrorKind::RetryLimitExceeded`] originates in the retry loop.
//! Transport and OAuth failures are carried through untouched: the original
//! error is kept as `source` and can be recovered with
//! [`Error::transport_error`] / [`Error::auth_error`].

/// Result type alias for restforce-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for restforce-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if every attempt was answered with 401.
    pub fn is_retry_limit_exceeded(&self) -> bool {
        matches!(self.kind, ErrorKind::RetryLimitExceeded { .. })
    }

    /// The transport error this error wraps, if any.
    pub fn transport_error(&self) -> Option<&restforce_client::Error> {
        match self.kind {
            ErrorKind::Transport(_) => self.source.as_ref()?.downcast_ref(),
            _ => None,
        }
    }

    /// The OAuth provider error this error wraps, if any.
    pub fn auth_error(&self) -> Option<&restforce_auth::Error> {
        match self.kind {
            ErrorKind::Auth(_) => self.source.as_ref()?.downcast_ref(),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Every attempt returned 401, even after refreshing the token.
    #[error("Max retry limit of {max_attempts} has been reached. oAuth Token Failed.")]
    RetryLimitExceeded { max_attempts: u32 },

    /// Sending the request failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Refreshing the access token failed.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Salesforce answered with a non-success status.
    #[error("Salesforce error ({status}): {error_code} - {message}")]
    Salesforce {
        status: u16,
        error_code: String,
        message: String,
    },

    /// Caller input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<restforce_client::Error> for Error {
    fn from(err: restforce_client::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<restforce_auth::Error> for Error {
    fn from(err: restforce_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_limit_message_mentions_limit() {
        let err = Error::new(ErrorKind::RetryLimitExceeded { max_attempts: 3 });
        assert!(err.is_retry_limit_exceeded());
        assert_eq!(
            err.to_string(),
            "Max retry limit of 3 has been reached. oAuth Token Failed."
        );
    }

    #[test]
    fn test_transport_error_is_recoverable() {
        let inner = restforce_client::Error::new(restforce_client::ErrorKind::Timeout);
        let err: Error = inner.into();

        assert!(matches!(err.kind, ErrorKind::Transport(_)));
        let original = err.transport_error().unwrap();
        assert!(matches!(original.kind, restforce_client::ErrorKind::Timeout));
        assert!(err.auth_error().is_none());
    }

    #[test]
    fn test_auth_error_is_recoverable() {
        let inner = restforce_auth::Error::new(restforce_auth::ErrorKind::OAuth {
            error: "invalid_grant".to_string(),
            description: "expired access/refresh token".to_string(),
        });
        let err: Error = inner.into();

        assert!(err.to_string().contains("invalid_grant"));
        assert!(err.auth_error().unwrap().is_invalid_grant());
        assert!(err.transport_error().is_none());
    }
}
