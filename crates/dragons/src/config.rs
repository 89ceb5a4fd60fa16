//! Configuration for locating the catalog document.
//!
//! The bucket and key of the catalog document are not configured directly in
//! production: they are looked up by name in a [`ConfigSource`] (SSM
//! Parameter Store) on every invocation. [`Settings`] holds the parameter
//! names, and optionally direct values that bypass the lookup for local runs.
//!
//! Settings come from defaults, then an optional YAML file, then environment
//! variables, then command-line flags.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Default parameter holding the bucket name.
pub const DEFAULT_BUCKET_PARAMETER: &str = "dragon_data_bucket_name";

/// Default parameter holding the document key.
pub const DEFAULT_KEY_PARAMETER: &str = "dragon_data_file_name";

/// Environment variable overriding the bucket parameter name.
pub const BUCKET_PARAMETER_ENV: &str = "DRAGONS_BUCKET_PARAMETER";

/// Environment variable overriding the key parameter name.
pub const KEY_PARAMETER_ENV: &str = "DRAGONS_KEY_PARAMETER";

/// Environment variable setting the bucket directly.
pub const BUCKET_ENV: &str = "DRAGONS_BUCKET";

/// Environment variable setting the key directly.
pub const KEY_ENV: &str = "DRAGONS_KEY";

/// Source of named configuration values.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Resolve the value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParameterNotFound` if `name` is unknown, or
    /// `Error::Backend` if the lookup itself fails.
    async fn get(&self, name: &str) -> Result<String>;
}

/// Address of the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataLocation {
    /// Bucket name
    pub bucket: String,

    /// Object key within the bucket
    pub key: String,
}

impl DataLocation {
    /// Create a location from a bucket and key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for DataLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Settings file structure.
///
/// ```yaml
/// bucket-parameter: dragon_data_bucket_name
/// key-parameter: dragon_data_file_name
/// bucket: my-dragons      # optional, skips the parameter lookup
/// key: dragons.json       # optional, skips the parameter lookup
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Parameter name holding the bucket
    pub bucket_parameter: String,

    /// Parameter name holding the key
    pub key_parameter: String,

    /// Bucket to use instead of looking it up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Key to use instead of looking it up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket_parameter: DEFAULT_BUCKET_PARAMETER.to_string(),
            key_parameter: DEFAULT_KEY_PARAMETER.to_string(),
            bucket: None,
            key: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or `Error::Config` if
    /// it is not valid YAML for this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Default settings with process environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Variables that are unset or empty leave the current value in place.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = var(BUCKET_PARAMETER_ENV) {
            self.bucket_parameter = value;
        }
        if let Some(value) = var(KEY_PARAMETER_ENV) {
            self.key_parameter = value;
        }
        if let Some(value) = var(BUCKET_ENV) {
            self.bucket = Some(value);
        }
        if let Some(value) = var(KEY_ENV) {
            self.key = Some(value);
        }
        self
    }

    /// Resolve the catalog location, consulting `source` for any value not
    /// set directly.
    ///
    /// # Errors
    ///
    /// Propagates any lookup failure from `source`.
    pub async fn resolve(&self, source: &dyn ConfigSource) -> Result<DataLocation> {
        let bucket = match &self.bucket {
            Some(bucket) => bucket.clone(),
            None => source.get(&self.bucket_parameter).await?,
        };
        let key = match &self.key {
            Some(key) => key.clone(),
            None => source.get(&self.key_parameter).await?,
        };

        tracing::debug!(%bucket, %key, "Resolved catalog location");
        Ok(DataLocation { bucket, key })
    }
}

// ========== Test Utilities ==========

/// In-process [`ConfigSource`] for tests.
///
/// Holds a fixed set of values and records every name it is asked for.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MockConfigSource {
    values: std::collections::HashMap<String, String>,
    lookups: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockConfigSource {
    /// Create an empty source; every lookup fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding the default bucket and key parameters.
    #[must_use]
    pub fn for_location(location: &DataLocation) -> Self {
        Self::new()
            .with(DEFAULT_BUCKET_PARAMETER, &location.bucket)
            .with(DEFAULT_KEY_PARAMETER, &location.key)
    }

    /// Add a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Names looked up so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the lookup log mutex is poisoned.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl ConfigSource for MockConfigSource {
    async fn get(&self, name: &str) -> Result<String> {
        self.lookups.lock().unwrap().push(name.to_string());
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ParameterNotFound(name.to_string()))
    }
}
