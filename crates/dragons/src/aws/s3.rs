//! S3 adapter: S3 Select queries and whole-object reads and writes.

use super::backend_error;
use crate::config::DataLocation;
use crate::error::Result;
use crate::select::{EventStream, ObjectQueryBackend, SelectEvent, SelectRequest};
use crate::store::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    CompressionType, ExpressionType, InputSerialization, JsonInput, JsonOutput, JsonType,
    OutputSerialization, SelectObjectContentEventStream,
};

const SELECT_OPERATION: &str = "SelectObjectContent";

/// S3-backed query backend and object store.
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// Wrap an existing S3 client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// The catalog is one uncompressed JSON array.
fn input_serialization() -> InputSerialization {
    InputSerialization::builder()
        .json(JsonInput::builder().r#type(JsonType::Document).build())
        .compression_type(CompressionType::None)
        .build()
}

fn output_serialization() -> OutputSerialization {
    OutputSerialization::builder()
        .json(JsonOutput::builder().build())
        .build()
}

fn convert_event(event: SelectObjectContentEventStream) -> SelectEvent {
    match event {
        SelectObjectContentEventStream::Records(records) => {
            SelectEvent::Records(records.payload.map(|blob| blob.into_inner()).unwrap_or_default())
        }
        SelectObjectContentEventStream::Progress(_) => SelectEvent::Progress,
        SelectObjectContentEventStream::Stats(_) => SelectEvent::Stats,
        SelectObjectContentEventStream::Cont(_) => SelectEvent::Continuation,
        SelectObjectContentEventStream::End(_) => SelectEvent::End,
        _ => SelectEvent::Other,
    }
}

#[async_trait]
impl ObjectQueryBackend for S3Backend {
    async fn select(&self, request: &SelectRequest) -> Result<EventStream> {
        let output = self
            .client
            .select_object_content()
            .bucket(&request.location.bucket)
            .key(&request.location.key)
            .expression(&request.expression)
            .expression_type(ExpressionType::Sql)
            .input_serialization(input_serialization())
            .output_serialization(output_serialization())
            .send()
            .await
            .map_err(|e| backend_error(SELECT_OPERATION, &e))?;

        // The receiver is owned by the stream and closed when it is dropped.
        let events = futures::stream::unfold(output.payload, |mut receiver| async move {
            match receiver.recv().await {
                Ok(Some(event)) => Some((Ok(convert_event(event)), receiver)),
                Ok(None) => None,
                Err(err) => Some((Err(backend_error(SELECT_OPERATION, &err)), receiver)),
            }
        });

        Ok(Box::pin(events))
    }
}

#[async_trait]
impl ObjectStore for S3Backend {
    async fn get(&self, location: &DataLocation) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| backend_error("GetObject", &e))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| backend_error("GetObject", &e))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, location: &DataLocation, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| backend_error("PutObject", &e))?;

        tracing::debug!(%location, "Wrote catalog document");
        Ok(())
    }
}
