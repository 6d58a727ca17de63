//! Error types for the Engage SDK.

use crate::transport::TransportError;
use std::convert::Infallible;

/// Errors that can occur when using the Engage SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key or secret was empty at construction.
    #[error("API key not set")]
    MissingCredentials,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Request payload could not be encoded as JSON.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Sending the request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body could not be decoded into the requested type.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Identify was given no user object.
    #[error("You need to pass an object with at least and id and email")]
    InvalidUserData,

    /// Identify data has no `id`.
    #[error("ID is missing")]
    MissingId,

    /// Identify data has no `email`, or it is not a valid address.
    #[error("Email is missing or invalid")]
    InvalidOrMissingEmail,

    /// Empty user id passed to an attribute or event call.
    #[error("User id missing")]
    MissingUserId,

    /// User id is `.` or `..`, which cannot be addressed as a path segment.
    #[error("User id {0:?} cannot be used in a URL path")]
    InvalidUserId(String),

    /// Attribute or event data is missing or has an unsupported shape.
    #[error("Attributes data is missing")]
    MissingAttributeData,
}

impl Error {
    /// Whether the remote end closed the connection before the response completed.
    pub fn is_premature_close(&self) -> bool {
        matches!(self, Error::Transport(TransportError::PrematureClose(_)))
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_premature_close_detection() {
        let err = Error::from(TransportError::PrematureClose(Box::new(io::Error::from(
            io::ErrorKind::UnexpectedEof,
        ))));
        assert!(err.is_premature_close());
        assert!(err
            .to_string()
            .starts_with("remote server prematurely closed connection"));

        let err = Error::from(TransportError::Request("dns failure".into()));
        assert!(!err.is_premature_close());
        assert_eq!(err.to_string(), "while making http request: dns failure");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(Error::MissingCredentials.to_string(), "API key not set");
        assert_eq!(Error::MissingId.to_string(), "ID is missing");
        assert_eq!(Error::MissingUserId.to_string(), "User id missing");
    }
}
