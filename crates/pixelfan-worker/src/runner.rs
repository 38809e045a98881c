//! Queue polling runner
//!
//! One runner per worker queue: receive a batch, dispatch it, settle each
//! message by its outcome. Successes are acked; transient failures are left
//! for the queue's redelivery; terminal failures go to the dead-letter sink
//! when one is configured, otherwise they too are left to the queue's policy
//! (and its own redrive limit).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use pixelfan_messaging::{QueueConsumer, TopicPublisher};

use crate::batch::{dispatch_batch, Disposition, MessageOutcome};
use crate::handler::MessageHandler;

pub struct QueueRunner {
    handler: Arc<dyn MessageHandler>,
    queue: Arc<dyn QueueConsumer>,
    dead_letter: Option<Arc<dyn TopicPublisher>>,
    idle_backoff: Duration,
}

impl QueueRunner {
    pub fn new(
        handler: Arc<dyn MessageHandler>,
        queue: Arc<dyn QueueConsumer>,
        dead_letter: Option<Arc<dyn TopicPublisher>>,
        idle_backoff: Duration,
    ) -> Self {
        QueueRunner {
            handler,
            queue,
            dead_letter,
            idle_backoff,
        }
    }

    /// Poll until the shutdown signal flips.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(worker = self.handler.name(), "queue runner started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                processed = self.poll_once() => {
                    if processed == 0 {
                        tokio::select! {
                            _ = shutdown.changed() => break,
                            _ = sleep(self.idle_backoff) => {}
                        }
                    }
                }
            }
        }

        tracing::info!(worker = self.handler.name(), "queue runner stopped");
    }

    /// One receive/dispatch/settle cycle. Returns how many messages the
    /// receive produced.
    pub async fn poll_once(&self) -> usize {
        let messages = match self.queue.receive().await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(
                    worker = self.handler.name(),
                    error = %e,
                    "queue receive failed"
                );
                return 0;
            }
        };

        if messages.is_empty() {
            return 0;
        }

        let count = messages.len();
        let outcomes = dispatch_batch(self.handler.as_ref(), messages).await;
        for outcome in &outcomes {
            self.settle(outcome).await;
        }
        count
    }

    async fn settle(&self, outcome: &MessageOutcome) {
        match outcome.disposition() {
            Disposition::Ack => self.ack(outcome).await,
            Disposition::Retry => {
                tracing::warn!(
                    worker = self.handler.name(),
                    message_id = %outcome.message.id,
                    "leaving message for redelivery"
                );
            }
            Disposition::DeadLetter => match &self.dead_letter {
                Some(sink) => match sink.publish(&outcome.message.body).await {
                    Ok(()) => {
                        tracing::warn!(
                            worker = self.handler.name(),
                            message_id = %outcome.message.id,
                            "message routed to dead-letter sink"
                        );
                        self.ack(outcome).await;
                    }
                    Err(e) => {
                        tracing::error!(
                            worker = self.handler.name(),
                            message_id = %outcome.message.id,
                            error = %e,
                            "dead-letter publish failed, leaving for redelivery"
                        );
                    }
                },
                None => {
                    tracing::warn!(
                        worker = self.handler.name(),
                        message_id = %outcome.message.id,
                        "terminal failure with no dead-letter sink configured"
                    );
                }
            },
        }
    }

    async fn ack(&self, outcome: &MessageOutcome) {
        // A failed ack only means redelivery, which idempotent processing
        // absorbs.
        if let Err(e) = self.queue.ack(&outcome.message).await {
            tracing::warn!(
                worker = self.handler.name(),
                message_id = %outcome.message.id,
                error = %e,
                "ack failed"
            );
        }
    }
}
