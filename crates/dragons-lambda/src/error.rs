//! Error types for the Lambda handlers.

use lambda_runtime::Diagnostic;
use thiserror::Error;

/// Errors returned from a function invocation.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// An error from the catalog operations.
    #[error(transparent)]
    Dragons(#[from] dragons::Error),

    /// The response could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP response could not be built.
    #[error("Response error: {0}")]
    Response(#[from] lambda_http::http::Error),
}

impl FunctionError {
    /// The error type reported to the invoker.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Dragons(err) => err.error_type(),
            Self::Json(_) => "JsonError",
            Self::Response(_) => "ResponseError",
        }
    }
}

impl From<FunctionError> for Diagnostic {
    fn from(err: FunctionError) -> Self {
        tracing::error!(error_type = err.error_type(), error = %err, "Invocation failed");
        Self {
            error_type: err.error_type().to_string(),
            error_message: err.to_string(),
        }
    }
}

/// Result type for Lambda handlers.
pub type Result<T> = std::result::Result<T, FunctionError>;
