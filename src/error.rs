//! Error handling for the Courier library.
//!
//! Errors fall into three groups that surface at different times:
//!
//! - [`Error::Validation`] is returned synchronously while a request is being
//!   built (bad URL, unknown method, malformed header or query arguments).
//! - [`Error::Transport`] is returned when the request is executed and the
//!   underlying transport could not complete the exchange.
//! - [`Error::HttpStatus`] is returned when the exchange completed but the
//!   server answered with a non-success status.

use std::io;
use thiserror::Error;

use crate::response::Response;

/// Errors that can happen when using Courier.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input given to a request constructor or mutator.
    ///
    /// Never retried and never deferred: it is returned by the call that
    /// received the bad argument.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network-level failure reported by the transport.
    #[error("Transport error")]
    Transport {
        #[from]
        source: TransportError,
    },

    /// The server answered with a status outside the success range.
    ///
    /// The full response envelope is kept so callers can still inspect
    /// headers or the error body.
    #[error("Got: {status} {status_text}")]
    HttpStatus {
        status: u16,
        status_text: String,
        response: Box<Response>,
    },

    /// JSON serialization or typed deserialization failed.
    #[error("JSON error")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// I/O Error.
    ///
    /// Raised while reading file-backed multipart parts.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Returns true for errors raised while building a request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response envelope carried by an [`Error::HttpStatus`].
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::HttpStatus { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Failures raised by a [`Transport`](crate::http::Transport) implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the middleware stack wrapping the reqwest client.
    #[error("Middleware Error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// Error from a custom transport.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for operations that can fail with a Courier error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        let err = Error::validation("bad input");
        assert!(err.is_validation());
        assert_eq!(err.status(), None);
        assert!(err.response().is_none());
        assert_eq!(err.to_string(), "Validation error: bad input");
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Other("connection refused".into()).into();
        assert!(!err.is_validation());
        assert!(matches!(err, Error::Transport { .. }));
    }
}
