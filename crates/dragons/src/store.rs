//! Whole-object storage for the catalog document.

use crate::config::DataLocation;
use crate::error::Result;
use async_trait::async_trait;

/// Object storage holding the catalog document.
///
/// Objects are read and written whole. There is no conditional put, so two
/// writers racing on the same key both succeed and the last one wins.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full contents of the object at `location`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` if the object does not exist or the read fails.
    async fn get(&self, location: &DataLocation) -> Result<Vec<u8>>;

    /// Replace the object at `location` with `body`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` if the write fails.
    async fn put(&self, location: &DataLocation, body: Vec<u8>) -> Result<()>;
}

// ========== Test Utilities ==========

/// [`ObjectStore`] backed by a map, for tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: std::sync::Mutex<std::collections::HashMap<DataLocation, Vec<u8>>>,
    puts: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-util"))]
impl InMemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one object.
    #[must_use]
    pub fn with_object(location: &DataLocation, body: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .objects
            .lock()
            .unwrap()
            .insert(location.clone(), body.into());
        store
    }

    /// Current contents of the object at `location`.
    ///
    /// # Panics
    ///
    /// Panics if the object map mutex is poisoned.
    #[must_use]
    pub fn object(&self, location: &DataLocation) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(location).cloned()
    }

    /// Number of successful puts.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, location: &DataLocation) -> Result<Vec<u8>> {
        self.object(location).ok_or_else(|| {
            crate::error::Error::backend("GetObject", format!("NoSuchKey: {location}"))
        })
    }

    async fn put(&self, location: &DataLocation, body: Vec<u8>) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(location.clone(), body);
        self.puts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
