//! SQS queue consumer and sender
//!
//! [`SqsQueue`] long-polls a queue and deletes messages on ack; anything not
//! acked reappears after the visibility timeout. [`SqsSender`] pushes a
//! payload onto a queue directly, which is how the runner routes
//! never-retryable messages to a dead-letter queue.

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;

use crate::traits::{QueueConsumer, QueueError, QueueMessage, QueueResult, TopicPublisher};

pub struct SqsQueue {
    client: SqsClient,
    queue_url: String,
    max_messages: i32,
    wait_time_secs: i32,
}

impl SqsQueue {
    pub fn new(client: SqsClient, queue_url: String, max_messages: i32, wait_time_secs: i32) -> Self {
        SqsQueue {
            client,
            queue_url,
            max_messages,
            wait_time_secs,
        }
    }
}

#[async_trait]
impl QueueConsumer for SqsQueue {
    async fn receive(&self) -> QueueResult<Vec<QueueMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(self.max_messages)
            .wait_time_seconds(self.wait_time_secs)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, queue_url = %self.queue_url, "SQS receive failed");
                QueueError::ReceiveFailed(e.to_string())
            })?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                // A message without a receipt handle cannot be acked; skip it
                // and let redelivery produce a usable one.
                let receipt = m.receipt_handle?;
                Some(QueueMessage {
                    id: m.message_id.unwrap_or_default(),
                    receipt,
                    body: m.body.unwrap_or_default(),
                })
            })
            .collect();

        Ok(messages)
    }

    async fn ack(&self, message: &QueueMessage) -> QueueResult<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(&message.receipt)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    queue_url = %self.queue_url,
                    message_id = %message.id,
                    "SQS delete failed"
                );
                QueueError::AckFailed(e.to_string())
            })?;

        tracing::debug!(
            queue_url = %self.queue_url,
            message_id = %message.id,
            "message acked"
        );

        Ok(())
    }
}

/// Direct sender onto a queue, used as a dead-letter sink.
pub struct SqsSender {
    client: SqsClient,
    queue_url: String,
}

impl SqsSender {
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        SqsSender { client, queue_url }
    }
}

#[async_trait]
impl TopicPublisher for SqsSender {
    async fn publish(&self, payload: &str) -> QueueResult<()> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, queue_url = %self.queue_url, "SQS send failed");
                QueueError::PublishFailed(e.to_string())
            })?;

        Ok(())
    }
}
