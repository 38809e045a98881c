//! Messaging abstraction traits

use async_trait::async_trait;
use thiserror::Error;

use pixelfan_core::error::{IoOp, PipelineError};

/// Messaging operation errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("publish failed: {0}")]
    PublishFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    #[error("ack failed: {0}")]
    AckFailed(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

impl From<QueueError> for PipelineError {
    fn from(err: QueueError) -> Self {
        let op = match &err {
            QueueError::PublishFailed(_) => IoOp::Publish,
            QueueError::ReceiveFailed(_) | QueueError::AckFailed(_) => IoOp::Receive,
        };
        PipelineError::transient(op, err)
    }
}

/// One delivered queue message. `receipt` is what acking requires; redelivery
/// of the same message yields a fresh receipt.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,
    pub receipt: String,
    pub body: String,
}

/// Fanout topic: publish a string payload to every subscribed queue.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, payload: &str) -> QueueResult<()>;
}

/// At-least-once queue: receive a batch, ack what was fully processed.
/// Messages never acked are redelivered by the queue's own policy.
#[async_trait]
pub trait QueueConsumer: Send + Sync {
    async fn receive(&self) -> QueueResult<Vec<QueueMessage>>;

    async fn ack(&self, message: &QueueMessage) -> QueueResult<()>;
}
