//! Upload notifier
//!
//! Reacts to blob-store write notifications: one compact upload event per
//! written object, published to the fanout topic. Publishing is coarse-grained
//! on purpose — a failed publish fails the whole notification document so the
//! delivery mechanism replays it entirely, and downstream idempotency absorbs
//! the duplicates that replay produces.

use std::sync::Arc;

use async_trait::async_trait;

use pixelfan_core::error::PipelineError;
use pixelfan_core::models::{S3Event, UploadEvent};
use pixelfan_messaging::TopicPublisher;

use crate::handler::MessageHandler;

pub struct UploadNotifier {
    topic: Arc<dyn TopicPublisher>,
}

impl UploadNotifier {
    pub fn new(topic: Arc<dyn TopicPublisher>) -> Self {
        UploadNotifier { topic }
    }

    /// Publish one upload event per record. No deduplication at this stage.
    pub async fn notify(&self, event: &S3Event) -> Result<(), PipelineError> {
        for record in &event.records {
            let upload = UploadEvent::new(record.bucket_name(), record.decoded_key()?);

            tracing::info!(
                bucket = %upload.bucket,
                key = %upload.key,
                event_name = %record.event_name,
                "blob write notification received"
            );

            let payload = serde_json::to_string(&upload)?;
            self.topic.publish(&payload).await?;

            tracing::info!(
                bucket = %upload.bucket,
                key = %upload.key,
                "upload event published"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl MessageHandler for UploadNotifier {
    fn name(&self) -> &'static str {
        "notifier"
    }

    async fn handle(&self, body: &str) -> Result<(), PipelineError> {
        let event = S3Event::from_json(body)?;
        self.notify(&event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfan_messaging::{MemoryTopic, QueueConsumer};

    fn notification(bucket: &str, keys: &[&str]) -> String {
        let records: Vec<String> = keys
            .iter()
            .map(|key| {
                format!(
                    r#"{{"eventName":"ObjectCreated:Put","s3":{{"bucket":{{"name":"{bucket}"}},"object":{{"key":"{key}"}}}}}}"#
                )
            })
            .collect();
        format!(r#"{{"Records":[{}]}}"#, records.join(","))
    }

    #[tokio::test]
    async fn test_one_event_per_record() {
        let topic = MemoryTopic::new();
        let queue = topic.subscribe().await;
        let notifier = UploadNotifier::new(Arc::new(topic));

        notifier
            .handle(&notification("uploads", &["a.png", "b/c.jpg"]))
            .await
            .unwrap();

        let batch = queue.receive().await.unwrap();
        assert_eq!(batch.len(), 2);
        let first = UploadEvent::from_json(&batch[0].body).unwrap();
        assert_eq!(first, UploadEvent::new("uploads", "a.png"));
        let second = UploadEvent::from_json(&batch[1].body).unwrap();
        assert_eq!(second, UploadEvent::new("uploads", "b/c.jpg"));
    }

    #[tokio::test]
    async fn test_url_encoded_keys_are_decoded() {
        let topic = MemoryTopic::new();
        let queue = topic.subscribe().await;
        let notifier = UploadNotifier::new(Arc::new(topic));

        notifier
            .handle(&notification("uploads", &["my+photo%281%29.png"]))
            .await
            .unwrap();

        let batch = queue.receive().await.unwrap();
        let event = UploadEvent::from_json(&batch[0].body).unwrap();
        assert_eq!(event.key, "my photo(1).png");
    }

    #[tokio::test]
    async fn test_malformed_notification_is_terminal() {
        let topic = MemoryTopic::new();
        let notifier = UploadNotifier::new(Arc::new(topic));
        let err = notifier.handle("not a document").await.unwrap_err();
        assert!(!err.is_retryable());
    }
}
