//! Converter worker
//!
//! Normalizes every source to a maximum-quality JPEG at
//! `converted/{name}.jpg`. Upload is the final step, so a failed decode or
//! encode leaves no artifact behind; a repeated run overwrites the same key
//! with equivalent bytes.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use pixelfan_core::error::PipelineError;
use pixelfan_core::models::UploadEvent;
use pixelfan_core::naming;
use pixelfan_processing::{CodecRegistry, EncodeOptions, SourceFormat};
use pixelfan_storage::BlobStore;

use crate::handler::MessageHandler;

pub struct ConverterWorker {
    blobs: Arc<dyn BlobStore>,
    codecs: Arc<CodecRegistry>,
}

impl ConverterWorker {
    pub fn new(blobs: Arc<dyn BlobStore>, codecs: Arc<CodecRegistry>) -> Self {
        ConverterWorker { blobs, codecs }
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

        let (image, format) = self.codecs.decode(&object.bytes)?;
        tracing::debug!(format = format.name(), "source image decoded");

        let jpeg = self
            .codecs
            .encode(SourceFormat::Jpeg, &image, &EncodeOptions::max_quality())?;

        let target_key = naming::converted_key(&event.key);
        self.blobs
            .put_object(&event.bucket, &target_key, Bytes::from(jpeg))
            .await?;

        tracing::info!(
            bucket = %event.bucket,
            key = %target_key,
            source_format = format.name(),
            "converted artifact stored"
        );

        Ok(())
    }
}

#[async_trait]
impl MessageHandler for ConverterWorker {
    fn name(&self) -> &'static str {
        "convert"
    }

    async fn handle(&self, body: &str) -> Result<(), PipelineError> {
        let event = UploadEvent::from_json(body)?;
        self.process(&event).await
    }
}
