//! Running select expressions and reassembling their results.
//!
//! An [`ObjectQueryBackend`] evaluates an expression against the catalog
//! document and returns a stream of [`SelectEvent`]s. Only
//! [`SelectEvent::Records`] carries data: a chunk of newline-delimited JSON,
//! one matched record per line. Progress, stats, continuation and end events
//! are skipped.
//!
//! Each chunk is decoded on its own, in stream order. A record that straddles
//! two chunks is not reassembled.

use crate::config::DataLocation;
use crate::domain::Dragon;
use crate::error::Result;
use async_trait::async_trait;
use dragons_jsonl::JsonlReader;
use futures::TryStreamExt;
use futures::stream::BoxStream;

/// A select expression bound to a document.
///
/// The document is read as one uncompressed JSON value and matches come back
/// as newline-delimited JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRequest {
    /// Document to query
    pub location: DataLocation,

    /// Select expression
    pub expression: String,
}

impl SelectRequest {
    /// Create a request for `expression` against `location`.
    pub fn new(location: DataLocation, expression: impl Into<String>) -> Self {
        Self {
            location,
            expression: expression.into(),
        }
    }
}

/// One event of a select response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// A chunk of matched records, newline-delimited JSON
    Records(Vec<u8>),

    /// Bytes scanned/processed so far
    Progress,

    /// Final scan statistics
    Stats,

    /// Keep-alive
    Continuation,

    /// The query completed
    End,

    /// An event kind this crate does not know about
    Other,
}

/// Stream of select events; an `Err` item ends the query.
pub type EventStream = BoxStream<'static, Result<SelectEvent>>;

/// Backend that evaluates select expressions against stored documents.
#[async_trait]
pub trait ObjectQueryBackend: Send + Sync {
    /// Submit `request` and return its event stream.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` if the query cannot be started. Failures after
    /// the stream is returned arrive as `Err` items.
    async fn select(&self, request: &SelectRequest) -> Result<EventStream>;
}

/// Run `request` and decode every matched record.
///
/// Records are returned in the order their chunks and lines arrived.
///
/// # Errors
///
/// Returns `Error::Decode` for the first malformed line; no partial list is
/// returned. Backend failures propagate unchanged.
pub async fn select_dragons(
    backend: &dyn ObjectQueryBackend,
    request: &SelectRequest,
) -> Result<Vec<Dragon>> {
    tracing::debug!(expression = %request.expression, location = %request.location, "Running select");

    let mut events = backend.select(request).await?;
    let mut dragons = Vec::new();
    let mut chunks = 0usize;

    while let Some(event) = events.try_next().await? {
        let SelectEvent::Records(payload) = event else {
            continue;
        };
        chunks += 1;

        let mut reader = JsonlReader::new(payload.as_slice());
        while let Some(dragon) = reader.read_line::<Dragon>().await? {
            dragons.push(dragon);
        }
    }

    tracing::debug!(chunks, records = dragons.len(), "Select complete");
    Ok(dragons)
}

/// Run `request` and report whether it matched anything.
///
/// Payload bytes are not decoded: any line that is not blank counts as a
/// match, whatever it contains. The stream is dropped as soon as the first
/// such line is seen.
///
/// # Errors
///
/// Backend failures before the first match propagate unchanged.
pub async fn select_any(backend: &dyn ObjectQueryBackend, request: &SelectRequest) -> Result<bool> {
    tracing::debug!(expression = %request.expression, location = %request.location, "Running existence check");

    let mut events = backend.select(request).await?;
    while let Some(event) = events.try_next().await? {
        let SelectEvent::Records(payload) = event else {
            continue;
        };

        if has_non_blank_line(&payload) {
            return Ok(true);
        }
    }

    Ok(false)
}

fn has_non_blank_line(payload: &[u8]) -> bool {
    payload
        .split(|byte| *byte == b'\n')
        .any(|line| !line.trim_ascii().is_empty())
}

// ========== Test Utilities ==========

/// Scripted [`ObjectQueryBackend`] for tests.
///
/// Every call to `select` replays the same events, optionally followed by a
/// backend failure, and records the request it was given.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MockSelectBackend {
    events: Vec<SelectEvent>,
    failure: Option<String>,
    refuse: Option<String>,
    requests: std::sync::Mutex<Vec<SelectRequest>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockSelectBackend {
    /// Create a backend that replays `events`.
    #[must_use]
    pub fn new(events: Vec<SelectEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Create a backend that returns one records chunk per slice of dragons,
    /// framed by progress and end events the way S3 Select sends them.
    #[must_use]
    pub fn with_chunks(chunks: &[&[Dragon]]) -> Self {
        let mut events = vec![SelectEvent::Progress];
        events.extend(chunks.iter().map(|chunk| records_chunk(chunk)));
        events.push(SelectEvent::Stats);
        events.push(SelectEvent::End);
        Self::new(events)
    }

    /// Emit a backend failure after the scripted events.
    #[must_use]
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Fail `select` itself instead of returning a stream.
    #[must_use]
    pub fn refusing_with(mut self, message: impl Into<String>) -> Self {
        self.refuse = Some(message.into());
        self
    }

    /// Requests received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<SelectRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Encode dragons as one records chunk (one JSON object per line).
///
/// # Panics
///
/// Panics if a dragon cannot be serialized, which cannot happen for
/// string-only records.
#[cfg(any(test, feature = "test-util"))]
#[must_use]
pub fn records_chunk(dragons: &[Dragon]) -> SelectEvent {
    let mut payload = Vec::new();
    for dragon in dragons {
        payload.extend(serde_json::to_vec(dragon).unwrap());
        payload.push(b'\n');
    }
    SelectEvent::Records(payload)
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl ObjectQueryBackend for MockSelectBackend {
    async fn select(&self, request: &SelectRequest) -> Result<EventStream> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.refuse {
            return Err(crate::error::Error::backend("SelectObjectContent", message.clone()));
        }

        let mut items: Vec<Result<SelectEvent>> = self.events.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.failure {
            items.push(Err(crate::error::Error::backend(
                "SelectObjectContent",
                message.clone(),
            )));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
