//! Error types for the spreadsheet store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the spreadsheet.
///
/// There is deliberately no retry policy here: transient quota or
/// network failures surface to the caller unchanged, and concurrent
/// writers resolve last-write-wins at the API.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The spreadsheet API rejected a request.
    #[error("sheets API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Error body, as returned.
        message: String,
    },

    /// The HTTP transport failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authentication with the service account failed.
    #[error("auth error: {message}")]
    Auth {
        /// What went wrong obtaining a token.
        message: String,
    },

    /// A credential file could not be read or parsed.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Signing the service-account assertion failed.
    #[error("assertion error: {0}")]
    Assertion(#[from] jsonwebtoken::errors::Error),

    /// A response body did not decode as expected.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No row carries the requested uid.
    #[error("no row with uid {uid} in worksheet {worksheet}")]
    UidNotFound {
        /// The worksheet searched.
        worksheet: String,
        /// The uid that was not found.
        uid: String,
    },

    /// The worksheet has no uid column, so locate-by-uid cannot work.
    #[error("worksheet {worksheet} has no uid column")]
    NoUidColumn {
        /// The worksheet read.
        worksheet: String,
    },

    /// A domain-level failure from the core model.
    #[error(transparent)]
    Core(#[from] vigia_core::Error),
}

impl Error {
    /// Build an auth error from a message.
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Error::Auth {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(
            err.to_string(),
            "sheets API error (HTTP 429): quota exceeded"
        );
    }

    #[test]
    fn test_uid_not_found_display() {
        let err = Error::UidNotFound {
            worksheet: "Prueba_1".into(),
            uid: "abc".into(),
        };
        assert!(err.to_string().contains("Prueba_1"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
