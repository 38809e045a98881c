//! Per-message batch dispatch
//!
//! A batch is processed sequentially, and every message resolves on its own:
//! a failure in one message does not block its siblings from being acked.
//! Each failed message carries the stage it failed in and a disposition —
//! retryable failures wait for redelivery, terminal ones are dead-letter
//! candidates.

use pixelfan_core::error::PipelineError;
use pixelfan_messaging::QueueMessage;

use crate::handler::MessageHandler;

/// What the runner should do with a processed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Fully processed; delete from the queue.
    Ack,
    /// Failed transiently; leave for redelivery.
    Retry,
    /// Failed terminally; redelivery can never succeed.
    DeadLetter,
}

/// One message's result within a batch.
#[derive(Debug)]
pub struct MessageOutcome {
    pub message: QueueMessage,
    pub result: Result<(), PipelineError>,
}

impl MessageOutcome {
    pub fn disposition(&self) -> Disposition {
        match &self.result {
            Ok(()) => Disposition::Ack,
            Err(e) if e.is_retryable() => Disposition::Retry,
            Err(_) => Disposition::DeadLetter,
        }
    }
}

/// Run a handler over a batch, one message at a time, collecting an outcome
/// per message.
pub async fn dispatch_batch(
    handler: &dyn MessageHandler,
    messages: Vec<QueueMessage>,
) -> Vec<MessageOutcome> {
    let mut outcomes = Vec::with_capacity(messages.len());

    for message in messages {
        tracing::debug!(
            worker = handler.name(),
            message_id = %message.id,
            "message received"
        );

        let result = handler.handle(&message.body).await;

        match &result {
            Ok(()) => {
                tracing::info!(
                    worker = handler.name(),
                    message_id = %message.id,
                    "message processed"
                );
            }
            Err(e) => {
                tracing::error!(
                    worker = handler.name(),
                    message_id = %message.id,
                    stage = %e.stage(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "message failed"
                );
            }
        }

        outcomes.push(MessageOutcome { message, result });
    }

    outcomes
}
