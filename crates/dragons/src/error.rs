//! Error types for dragons operations.

use std::io;
use thiserror::Error;

/// The error type for dragons operations.
///
/// Nothing in this crate retries or recovers from an error; every variant
/// propagates to the invoker of the list, add or validate entry point.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or whole-document parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (settings file, environment).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config source has no value for the named parameter.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// A call to a backend service failed.
    #[error("{operation} failed: {message}")]
    Backend {
        /// The backend operation that failed (e.g. `SelectObjectContent`).
        operation: &'static str,
        /// Description of the failure, including any service error context.
        message: String,
    },

    /// A line of a select result could not be decoded into a dragon.
    #[error("Malformed record at line {line_number}: {source}")]
    Decode {
        /// 1-based line number within the record chunk.
        line_number: usize,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A dragon with the same name already exists.
    #[error("{0}")]
    DuplicateDragon(String),
}

impl Error {
    /// Creates a `Backend` error for the given operation.
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }

    /// Returns a stable name for this error kind.
    ///
    /// Function invokers (for example a state machine `Catch` clause) match on
    /// this name, so it must not change between releases.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
            Self::Config(_) => "ConfigurationError",
            Self::ParameterNotFound(_) => "ParameterNotFound",
            Self::Backend { .. } => "BackendError",
            Self::Decode { .. } => "DecodeError",
            Self::DuplicateDragon(_) => "DragonValidationError",
        }
    }
}

impl From<dragons_jsonl::Error> for Error {
    fn from(err: dragons_jsonl::Error) -> Self {
        match err {
            dragons_jsonl::Error::Io(io_err) => Self::Io(io_err),
            dragons_jsonl::Error::Json(json_err) => Self::Json(json_err),
            dragons_jsonl::Error::InvalidLine {
                line_number,
                source,
            } => Self::Decode {
                line_number,
                source,
            },
        }
    }
}

/// A specialized Result type for dragons operations.
pub type Result<T> = std::result::Result<T, Error>;
