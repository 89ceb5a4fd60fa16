//! Lambda functions for the dragon catalog.
//!
//! Three functions share the handlers in this crate:
//!
//! - `list-dragons`: API Gateway proxy function; query-string `family` and
//!   `dragonName` filters in, JSON array of dragons out
//! - `add-dragon`: dragon record in, `"Dragon added"` out
//! - `validate-dragon`: dragon record in, `"Dragon validated"` out, or a
//!   `DragonValidationError` function error when the name is taken
//!
//! Each binary builds one [`DragonService`](dragons::service::DragonService)
//! at cold start and reuses it for every invocation.

pub mod error;
pub mod handlers;
pub mod telemetry;

pub use error::{FunctionError, Result};
