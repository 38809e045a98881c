//! SNS topic publisher

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;

use crate::traits::{QueueError, QueueResult, TopicPublisher};

pub struct SnsPublisher {
    client: SnsClient,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(client: SnsClient, topic_arn: String) -> Self {
        SnsPublisher { client, topic_arn }
    }
}

#[async_trait]
impl TopicPublisher for SnsPublisher {
    async fn publish(&self, payload: &str) -> QueueResult<()> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    topic_arn = %self.topic_arn,
                    "SNS publish failed"
                );
                QueueError::PublishFailed(e.to_string())
            })?;

        tracing::info!(
            topic_arn = %self.topic_arn,
            message_id = ?output.message_id(),
            "message published to topic"
        );

        Ok(())
    }
}
