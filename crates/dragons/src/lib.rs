//! Dragons - a dragon catalog kept as one JSON document in object storage.
//!
//! The catalog is a single JSON array of [`Dragon`](domain::Dragon) records.
//! Listing and duplicate checks run a select expression against the stored
//! document and reassemble the streamed results; adding a dragon rewrites the
//! whole document.
//!
//! Every external service sits behind a trait:
//!
//! - [`config::ConfigSource`] resolves the bucket and key (SSM Parameter Store)
//! - [`select::ObjectQueryBackend`] evaluates select expressions (S3 Select)
//! - [`store::ObjectStore`] reads and writes the whole document (S3)
//!
//! [`service::DragonService`] ties them together for the list, add and
//! validate entry points.

#![forbid(unsafe_code)]

pub mod aws;
pub mod config;
pub mod domain;
pub mod error;
pub mod query;
pub mod select;
pub mod service;
pub mod store;

// Command-line interface (used by the binary)
pub mod cli;

pub use error::{Error, Result};
