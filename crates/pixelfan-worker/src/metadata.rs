//! Metadata worker
//!
//! Fetches the source object, probes the image header (no full pixel decode),
//! and overwrites the metadata record keyed by the derived name. The record
//! write is the only side effect and runs last, so a failed message never
//! leaves a partial record behind.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use pixelfan_core::error::PipelineError;
use pixelfan_core::models::{ImageMetadata, MetadataRecord, UploadEvent};
use pixelfan_core::naming;
use pixelfan_processing::probe;
use pixelfan_storage::{BlobStore, MetadataStore};

use crate::handler::MessageHandler;

pub struct MetadataWorker {
    blobs: Arc<dyn BlobStore>,
    records: Arc<dyn MetadataStore>,
}

impl MetadataWorker {
    pub fn new(blobs: Arc<dyn BlobStore>, records: Arc<dyn MetadataStore>) -> Self {
        MetadataWorker { blobs, records }
    }

    pub async fn process(&self, event: &UploadEvent) -> Result<(), PipelineError> {
        let object = self.blobs.get_object(&event.bucket, &event.key).await?;

        tracing::info!(
            bucket = %event.bucket,
            key = %event.key,
            content_type = object.content_type.as_deref().unwrap_or("unknown"),
            content_length = object.len(),
            "source object fetched"
        );

        let probed = probe(&object.bytes)?;

        let record = MetadataRecord {
            name: naming::derived_name(&event.key).to_string(),
            bucket: event.bucket.clone(),
            metadata: ImageMetadata {
                width: probed.width,
                height: probed.height,
                format: probed.format,
                file_size: object.len(),
                file_name: naming::file_name(&event.key).to_string(),
                last_modified: Utc::now(),
            },
        };

        self.records.put_record(&record).await?;

        tracing::info!(
            name = %record.name,
            width = record.metadata.width,
            height = record.metadata.height,
            format = %record.metadata.format,
            "metadata record stored"
        );

        Ok(())
    }
}

#[async_trait]
impl MessageHandler for MetadataWorker {
    fn name(&self) -> &'static str {
        "metadata"
    }

    async fn handle(&self, body: &str) -> Result<(), PipelineError> {
        let event = UploadEvent::from_json(body)?;
        self.process(&event).await
    }
}
