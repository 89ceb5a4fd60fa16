//! The list, add and validate operations.
//!
//! [`DragonService`] owns the three backends and resolves the catalog
//! location from its [`Settings`] at the start of every operation.
//!
//! # Example
//!
//! ```no_run
//! use dragons::config::Settings;
//! use dragons::domain::DragonFilter;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let service = dragons::aws::connect(Settings::from_env()).await;
//!     let red = DragonFilter {
//!         family: Some("Red".to_string()),
//!         ..DragonFilter::default()
//!     };
//!     for dragon in service.list(&red).await? {
//!         println!("{}", dragon.name_or_empty());
//!     }
//!     Ok(())
//! }
//! ```

use crate::config::{ConfigSource, DataLocation, Settings};
use crate::domain::{Dragon, DragonFilter};
use crate::error::{Error, Result};
use crate::query;
use crate::select::{self, ObjectQueryBackend, SelectRequest};
use crate::store::ObjectStore;
use std::sync::Arc;

/// Confirmation returned by [`DragonService::add`].
pub const ADDED_MESSAGE: &str = "Dragon added";

/// Confirmation returned by [`DragonService::validate`].
pub const VALIDATED_MESSAGE: &str = "Dragon validated";

/// Message of the error raised when validation finds an existing dragon.
pub const DUPLICATE_MESSAGE: &str = "Duplicate dragon reported";

/// Catalog operations over pluggable backends.
#[derive(Clone)]
pub struct DragonService {
    settings: Settings,
    config: Arc<dyn ConfigSource>,
    query: Arc<dyn ObjectQueryBackend>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for DragonService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragonService")
            .field("settings", &self.settings)
            .field("config", &"<dyn ConfigSource>")
            .field("query", &"<dyn ObjectQueryBackend>")
            .field("store", &"<dyn ObjectStore>")
            .finish()
    }
}

impl DragonService {
    /// Create a service from settings and backends.
    pub fn new(
        settings: Settings,
        config: Arc<dyn ConfigSource>,
        query: Arc<dyn ObjectQueryBackend>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            settings,
            config,
            query,
            store,
        }
    }

    /// The settings this service resolves locations with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve the catalog location.
    ///
    /// # Errors
    ///
    /// Propagates config source failures.
    pub async fn location(&self) -> Result<DataLocation> {
        self.settings.resolve(self.config.as_ref()).await
    }

    /// List dragons matching `filter`, in document order.
    ///
    /// # Errors
    ///
    /// Propagates config, backend and decode failures.
    pub async fn list(&self, filter: &DragonFilter) -> Result<Vec<Dragon>> {
        let dragons = self.query(query::list_expression(filter)).await?;
        tracing::info!(count = dragons.len(), filtered = !filter.is_empty(), "Listed dragons");
        Ok(dragons)
    }

    /// Run an arbitrary select expression and decode the matches.
    ///
    /// # Errors
    ///
    /// Propagates config, backend and decode failures.
    pub async fn query(&self, expression: String) -> Result<Vec<Dragon>> {
        let location = self.location().await?;
        let request = SelectRequest::new(location, expression);
        select::select_dragons(self.query.as_ref(), &request).await
    }

    /// Append `dragon` to the catalog.
    ///
    /// Reads the whole document, appends, and writes the whole document back.
    /// Concurrent adds can overwrite each other; the last write wins.
    ///
    /// # Errors
    ///
    /// Propagates config and storage failures, and `Error::Json` if the stored
    /// document is not a JSON array of dragons.
    pub async fn add(&self, dragon: Dragon) -> Result<&'static str> {
        let location = self.location().await?;

        let body = self.store.get(&location).await?;
        let mut dragons: Vec<Dragon> = serde_json::from_slice(&body)?;
        let name = dragon.name_or_empty().to_string();
        dragons.push(dragon);

        self.store
            .put(&location, serde_json::to_vec(&dragons)?)
            .await?;

        tracing::info!(%location, dragon = %name, count = dragons.len(), "Added dragon");
        Ok(ADDED_MESSAGE)
    }

    /// Check that no dragon with `dragon`'s name exists yet.
    ///
    /// A dragon without a name is checked against the empty name.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDragon` if a match exists, and propagates
    /// config and backend failures.
    pub async fn validate(&self, dragon: &Dragon) -> Result<&'static str> {
        let name = dragon.name_or_empty();
        let location = self.location().await?;
        let request = SelectRequest::new(location, query::name_expression(name));

        if select::select_any(self.query.as_ref(), &request).await? {
            tracing::info!(dragon = %name, "Duplicate dragon found");
            return Err(Error::DuplicateDragon(DUPLICATE_MESSAGE.to_string()));
        }

        tracing::info!(dragon = %name, "Dragon validated");
        Ok(VALIDATED_MESSAGE)
    }
}

// ========== Test Utilities ==========

/// Build a service over in-memory test doubles.
///
/// The config source holds the default parameter names pointing at
/// `location`; `store` and `query` are used as given.
#[cfg(any(test, feature = "test-util"))]
pub fn test_service(
    location: &DataLocation,
    query: Arc<dyn ObjectQueryBackend>,
    store: Arc<dyn ObjectStore>,
) -> DragonService {
    DragonService::new(
        Settings::default(),
        Arc::new(crate::config::MockConfigSource::for_location(location)),
        query,
        store,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfigSource;
    use crate::select::{MockSelectBackend, SelectEvent, records_chunk};
    use crate::store::InMemoryObjectStore;

    fn location() -> DataLocation {
        DataLocation::new("dragon-data", "dragon_stats_one.txt")
    }

    fn dragon(name: &str, family: &str) -> Dragon {
        Dragon {
            family: Some(family.to_string()),
            description: Some(format!("{name} of the {family} family")),
            ..Dragon::named(name)
        }
    }

    fn stored(dragons: &[Dragon]) -> Arc<InMemoryObjectStore> {
        Arc::new(InMemoryObjectStore::with_object(
            &location(),
            serde_json::to_vec(dragons).unwrap(),
        ))
    }

    #[tokio::test]
    async fn add_appends_to_the_end() {
        let a = dragon("Atlas", "Red");
        let b = dragon("Bahamethut", "Red");
        let c = dragon("Cinder", "Blue");
        let store = stored(&[a.clone(), b.clone()]);
        let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

        let message = service.add(c.clone()).await.unwrap();
        assert_eq!(message, "Dragon added");

        let body = store.object(&location()).unwrap();
        let dragons: Vec<Dragon> = serde_json::from_slice(&body).unwrap();
        assert_eq!(dragons, vec![a, b, c]);
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn add_to_empty_catalog() {
        let store = Arc::new(InMemoryObjectStore::with_object(&location(), "[]"));
        let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

        service.add(Dragon::named("Atlas")).await.unwrap();

        let dragons: Vec<Dragon> = serde_json::from_slice(&store.object(&location()).unwrap()).unwrap();
        assert_eq!(dragons, vec![Dragon::named("Atlas")]);
    }

    #[tokio::test]
    async fn add_does_not_deduplicate() {
        let atlas = Dragon::named("Atlas");
        let store = stored(&[atlas.clone()]);
        let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

        service.add(atlas.clone()).await.unwrap();

        let dragons: Vec<Dragon> = serde_json::from_slice(&store.object(&location()).unwrap()).unwrap();
        assert_eq!(dragons, vec![atlas.clone(), atlas]);
    }

    #[tokio::test]
    async fn add_fails_on_corrupt_document_without_writing() {
        let store = Arc::new(InMemoryObjectStore::with_object(&location(), "{\"not\":\"a list\"}"));
        let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

        let err = service.add(Dragon::named("Atlas")).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn add_fails_when_document_is_missing() {
        let store = Arc::new(InMemoryObjectStore::new());
        let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store);

        let err = service.add(Dragon::named("Atlas")).await.unwrap_err();
        assert!(matches!(err, Error::Backend { operation: "GetObject", .. }));
    }

    #[tokio::test]
    async fn list_sends_translated_expression_to_resolved_location() {
        let backend = Arc::new(MockSelectBackend::with_chunks(&[&[dragon("Atlas", "Red")]]));
        let service = test_service(&location(), backend.clone(), Arc::new(InMemoryObjectStore::new()));
        let filter = DragonFilter {
            family: Some("Red".to_string()),
            dragon_name: None,
        };

        let dragons = service.list(&filter).await.unwrap();
        assert_eq!(dragons, vec![dragon("Atlas", "Red")]);

        let requests = backend.requests();
        assert_eq!(requests[0].location, location());
        assert_eq!(
            requests[0].expression,
            "select * from S3Object[*][*] s where s.family_str = 'Red'"
        );
    }

    #[tokio::test]
    async fn validate_succeeds_without_matches() {
        let backend = Arc::new(MockSelectBackend::new(vec![SelectEvent::Stats, SelectEvent::End]));
        let service = test_service(&location(), backend.clone(), Arc::new(InMemoryObjectStore::new()));

        let message = service.validate(&Dragon::named("Bahamethut")).await.unwrap();
        assert_eq!(message, "Dragon validated");
        assert_eq!(
            backend.requests()[0].expression,
            "select * from S3Object[*][*] s where s.dragon_name_str = 'Bahamethut'"
        );
    }

    #[tokio::test]
    async fn validate_fails_on_any_match() {
        let backend = Arc::new(MockSelectBackend::new(vec![records_chunk(&[Dragon::named(
            "Bahamethut",
        )])]));
        let service = test_service(&location(), backend, Arc::new(InMemoryObjectStore::new()));

        let err = service.validate(&Dragon::named("Bahamethut")).await.unwrap_err();
        assert!(matches!(&err, Error::DuplicateDragon(message) if message == "Duplicate dragon reported"));
    }

    #[tokio::test]
    async fn validate_reports_duplicate_for_undecodable_match() {
        let backend = Arc::new(MockSelectBackend::new(vec![SelectEvent::Records(vec![
            0xff, 0xfe, b'\n',
        ])]));
        let service = test_service(&location(), backend, Arc::new(InMemoryObjectStore::new()));

        let err = service.validate(&Dragon::named("Bahamethut")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateDragon(_)));
        assert_eq!(err.error_type(), "DragonValidationError");
    }

    #[tokio::test]
    async fn validate_without_name_checks_the_empty_name() {
        let backend = Arc::new(MockSelectBackend::default());
        let service = test_service(&location(), backend.clone(), Arc::new(InMemoryObjectStore::new()));

        service.validate(&Dragon::default()).await.unwrap();
        assert_eq!(
            backend.requests()[0].expression,
            "select * from S3Object[*][*] s where s.dragon_name_str = ''"
        );
    }

    #[tokio::test]
    async fn config_failure_stops_before_any_backend_call() {
        let backend = Arc::new(MockSelectBackend::default());
        let service = DragonService::new(
            Settings::default(),
            Arc::new(MockConfigSource::new()),
            backend.clone(),
            Arc::new(InMemoryObjectStore::new()),
        );

        let err = service.list(&DragonFilter::default()).await.unwrap_err();
        assert!(matches!(err, Error::ParameterNotFound(_)));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn every_operation_resolves_the_location_again() {
        let config = Arc::new(MockConfigSource::for_location(&location()));
        let service = DragonService::new(
            Settings::default(),
            config.clone(),
            Arc::new(MockSelectBackend::default()),
            Arc::new(InMemoryObjectStore::new()),
        );

        service.list(&DragonFilter::default()).await.unwrap();
        service.validate(&Dragon::named("Atlas")).await.unwrap();
        assert_eq!(config.lookups().len(), 4);
    }
}
