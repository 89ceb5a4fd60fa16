//! Async JSON Lines support for the dragons catalog.
//!
//! Object query results arrive as chunks of newline-delimited JSON. This
//! crate reads such chunks one record at a time and writes records back out
//! in the same format.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use writer::JsonlWriter;
