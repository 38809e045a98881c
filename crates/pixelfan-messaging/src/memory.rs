//! In-memory topic and queue
//!
//! Test doubles with the same delivery contract as the cloud backends: the
//! topic fans every published payload out to all attached queues; a queue
//! holds received-but-unacked messages in flight, and
//! [`MemoryQueue::redeliver_unacked`] plays the visibility timeout expiring.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::traits::{QueueConsumer, QueueError, QueueMessage, QueueResult, TopicPublisher};

const RECEIVE_BATCH_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct QueueInner {
    pending: VecDeque<QueueMessage>,
    in_flight: HashMap<String, QueueMessage>,
    next_id: u64,
}

/// In-memory queue with at-least-once semantics.
#[derive(Clone, Default)]
pub struct MemoryQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a payload directly.
    pub async fn push(&self, body: &str) {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = format!("m-{}", inner.next_id);
        inner.pending.push_back(QueueMessage {
            receipt: id.clone(),
            id,
            body: body.to_string(),
        });
    }

    /// Move every unacked in-flight message back to the front of the queue,
    /// as an expired visibility timeout would.
    pub async fn redeliver_unacked(&self) {
        let mut inner = self.inner.lock().await;
        let mut unacked: Vec<QueueMessage> = inner.in_flight.drain().map(|(_, m)| m).collect();
        unacked.sort_by(|a, b| a.id.cmp(&b.id));
        for message in unacked.into_iter().rev() {
            inner.pending.push_front(message);
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.lock().await.pending.len()
    }

    pub async fn in_flight_count(&self) -> usize {
        self.inner.lock().await.in_flight.len()
    }
}

#[async_trait]
impl QueueConsumer for MemoryQueue {
    async fn receive(&self) -> QueueResult<Vec<QueueMessage>> {
        let mut inner = self.inner.lock().await;
        let mut batch = Vec::new();
        while batch.len() < RECEIVE_BATCH_LIMIT {
            match inner.pending.pop_front() {
                Some(message) => {
                    inner
                        .in_flight
                        .insert(message.receipt.clone(), message.clone());
                    batch.push(message);
                }
                None => break,
            }
        }
        Ok(batch)
    }

    async fn ack(&self, message: &QueueMessage) -> QueueResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .in_flight
            .remove(&message.receipt)
            .map(|_| ())
            .ok_or_else(|| QueueError::AckFailed(format!("unknown receipt: {}", message.receipt)))
    }
}

/// Push-only view of a queue, usable as a dead-letter sink in tests.
#[async_trait]
impl TopicPublisher for MemoryQueue {
    async fn publish(&self, payload: &str) -> QueueResult<()> {
        self.push(payload).await;
        Ok(())
    }
}

/// In-memory fanout topic.
#[derive(Clone, Default)]
pub struct MemoryTopic {
    queues: Arc<RwLock<Vec<MemoryQueue>>>,
}

impl MemoryTopic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new queue subscribed to this topic.
    pub async fn subscribe(&self) -> MemoryQueue {
        let queue = MemoryQueue::new();
        self.queues.write().await.push(queue.clone());
        queue
    }
}

#[async_trait]
impl TopicPublisher for MemoryTopic {
    async fn publish(&self, payload: &str) -> QueueResult<()> {
        let queues = self.queues.read().await;
        for queue in queues.iter() {
            queue.push(payload).await;
        }
        tracing::debug!(subscribers = queues.len(), "payload fanned out");
        Ok(())
    }
}
