//! Error types shared by every handler.
//!
//! Failures collapse into a small closed set of kinds so that the transports
//! can pick an HTTP status (or just report the message) without parsing text.

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use serde_json::{json, Value};
use std::fmt::Debug;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    BackendUnavailable,
    Upstream,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    Upstream(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Validation(_) => ErrorKind::Validation,
            Error::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Error::Upstream(_) => ErrorKind::Upstream,
        }
    }

    /// The HTTP status used by the proxy-event transport.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::BackendUnavailable => 500,
            ErrorKind::Upstream => 502,
        }
    }

    /// The `{"error": ...}` body every transport reports.
    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    /// Map a DynamoDB SDK failure onto our kinds.
    ///
    /// We branch on the service error code rather than on each operation's
    /// error enum, since all six operations share the same interesting codes.
    pub fn from_sdk<E, R>(op: &str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: Debug,
    {
        let code = err.code().map(|c| c.to_owned());
        let message = format!("{op} failed: {}", DisplayErrorContext(&err));

        match code.as_deref() {
            Some("ResourceNotFoundException") => Error::NotFound(message),
            Some("ValidationException") => Error::Validation(message),
            _ => Error::BackendUnavailable(message),
        }
    }
}

impl From<serde_dynamo::Error> for Error {
    fn from(e: serde_dynamo::Error) -> Self {
        Error::Validation(format!("cannot convert item: {e}"))
    }
}
