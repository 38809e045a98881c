//! Resizer worker
//!
//! Decodes the source once, then runs one task per ladder entry against the
//! shared read-only image: resample, encode, upload. All three tasks are
//! joined before the message resolves, and a per-size result is collected so
//! a single failed size fails the whole message — two uploaded artifacts
//! never mask a missing third. Redelivery then overwrites all three paths.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use tokio::task::JoinHandle;

use pixelfan_core::constants::{SizeSpec, RESIZE_SPECS};
use pixelfan_core::error::{IoOp, PipelineError};
use pixelfan_core::models::UploadEvent;
use pixelfan_core::naming;
use pixelfan_processing::{resize_to_width, CodecRegistry, EncodeOptions, SourceFormat};
use pixelfan_storage::BlobStore;

use crate::handler::MessageHandler;

pub struct ResizerWorker {
    blobs: Arc<dyn BlobStore>,
    codecs: Arc<CodecRegistry>,
}

impl ResizerWorker {
    pub fn new(blobs: Arc<dyn BlobStore>, codecs: Arc<CodecRegistry>) -> Self {
        ResizerWorker { blobs, codecs }
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
        let source = Arc::new(image);

        let tasks: Vec<(&'static str, JoinHandle<Result<(), PipelineError>>)> = RESIZE_SPECS
            .iter()
            .map(|spec| {
                let blobs = self.blobs.clone();
                let codecs = self.codecs.clone();
                let source = source.clone();
                let bucket = event.bucket.clone();
                let target_key = naming::resized_key(&event.key, spec.name);
                let spec = *spec;
                (
                    spec.name,
                    tokio::spawn(async move {
                        Self::resize_and_upload(blobs, codecs, source, spec, bucket, target_key)
                            .await
                    }),
                )
            })
            .collect();

        let mut failures: Vec<(String, PipelineError)> = Vec::new();
        for (size_name, handle) in tasks {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push((size_name.to_string(), e)),
                Err(e) => failures.push((
                    size_name.to_string(),
                    PipelineError::transient(IoOp::Task, e),
                )),
            }
        }

        if failures.is_empty() {
            tracing::info!(
                bucket = %event.bucket,
                key = %event.key,
                sizes = RESIZE_SPECS.len(),
                "all resized artifacts stored"
            );
            Ok(())
        } else {
            Err(PipelineError::resize_fanout(failures))
        }
    }

    async fn resize_and_upload(
        blobs: Arc<dyn BlobStore>,
        codecs: Arc<CodecRegistry>,
        source: Arc<DynamicImage>,
        spec: SizeSpec,
        bucket: String,
        target_key: String,
    ) -> Result<(), PipelineError> {
        let resized = resize_to_width(&source, spec.width);
        let jpeg = codecs.encode(SourceFormat::Jpeg, &resized, &EncodeOptions::max_quality())?;

        blobs.put_object(&bucket, &target_key, Bytes::from(jpeg)).await?;

        tracing::debug!(
            bucket = %bucket,
            key = %target_key,
            size_name = spec.name,
            width = resized.width(),
            height = resized.height(),
            "resized artifact stored"
        );

        Ok(())
    }
}

#[async_trait]
impl MessageHandler for ResizerWorker {
    fn name(&self) -> &'static str {
        "resize"
    }

    async fn handle(&self, body: &str) -> Result<(), PipelineError> {
        let event = UploadEvent::from_json(body)?;
        self.process(&event).await
    }
}
