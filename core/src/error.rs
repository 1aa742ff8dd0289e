//! Error types for the SlimSurveys client.
//!
//! # Design
//! Only failures the caller cannot read off a response are errors here. A
//! 4xx/5xx status is still a successful call: the `Outcome` carries the
//! status code and body and the caller decides what it means.

use std::convert::Infallible;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `Client` and `Outcome`.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was constructed with an unusable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The request never produced a response (DNS, connect, timeout, TLS).
    ///
    /// `code` follows libcurl's error numbering and is never zero.
    #[error("transport error {code}: {message}")]
    Transport { code: u32, message: String },

    /// The response body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    /// A numeric lookup was negative.
    #[error("invalid lookup id {0}: ids are non-negative")]
    InvalidLookup(i64),

    /// A request payload could not be flattened into body fields.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A file marked for upload could not be read.
    #[error("cannot read upload {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl Error {
    /// Transport error code, if this is a transport failure.
    pub fn transport_code(&self) -> Option<u32> {
        match self {
            Error::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_code_and_message() {
        let err = Error::Transport {
            code: 7,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "transport error 7: connection refused");
        assert_eq!(err.transport_code(), Some(7));
        assert!(err.is_transport());
    }

    #[test]
    fn decode_error_has_no_transport_code() {
        let err = Error::Decode("expected value at line 1 column 1".to_string());
        assert!(err.is_decode());
        assert_eq!(err.transport_code(), None);
    }

    #[test]
    fn upload_error_names_the_file() {
        let err = Error::Upload {
            path: PathBuf::from("/tmp/missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.png"));
    }
}
