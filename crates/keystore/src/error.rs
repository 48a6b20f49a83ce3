use core::fmt::{Debug, Display};
use std::error::Error as StdError;

use reqwest::StatusCode;
use serde_json::error::Category;

/// Kind of error that can occur during key store operations.
#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// The key set document could not be fetched from its source.
    #[error("Fetch failure")]
    Fetch,
    /// The fetched document is not a valid key set.
    #[error("The key set is malformed")]
    Parse,
    /// The fetched document lists the same key identifier more than once.
    #[error("Duplicate key identifier")]
    DuplicateKey,
    /// No key with the requested identifier is active.
    #[error("Key not found")]
    NotFound,
    /// The refresh was cancelled before the new key set was published.
    #[error("Refresh cancelled")]
    Cancelled,
}

/// Failure reaching the remote key set source.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("unexpected HTTP status {status}, expected {expected}")]
    UnexpectedStatus {
        status: StatusCode,
        expected: StatusCode,
    },
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Represents all possible errors that can occur during key store operations.
pub struct Error {
    kind: ErrorKind,
    source: eyre::Report,
}

impl Error {
    /// Returns the kind of the error that occurred.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the lowest level error that caused this error.
    pub fn source(&self) -> &(dyn StdError + 'static) {
        self.source.root_cause()
    }

    /// Returns the context of the error.
    pub fn context(&self) -> &(dyn StdError) {
        self.source.as_ref()
    }

    /// Returns the HTTP status reported by the source, if the fetch got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self.source.downcast_ref::<FetchError>()? {
            FetchError::UnexpectedStatus { status, .. } => Some(*status),
            FetchError::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub(crate) fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error {
            kind,
            source: eyre::Report::new(source),
        }
    }

    pub(crate) fn msg<M>(kind: ErrorKind, msg: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Error {
            kind,
            source: eyre::Report::msg(msg),
        }
    }

    pub(crate) fn not_found(kid: &str) -> Self {
        Error::msg(ErrorKind::NotFound, format!("no active key with kid {kid:?}"))
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("context", &self.context())
            .field("source", &self.source())
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.context())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => Error::new(ErrorKind::Fetch, err),
            _ => Error::new(ErrorKind::Parse, err),
        }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Error::new(ErrorKind::Fetch, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_recoverable_from_fetch_errors() {
        let err: Error = FetchError::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            expected: StatusCode::OK,
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err: Error = serde_json::from_slice::<serde_json::Value>(b"{\"keys\": [")
            .unwrap_err()
            .into();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_not_found_names_the_kid() {
        let err = Error::not_found("old");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("\"old\""));
    }
}
