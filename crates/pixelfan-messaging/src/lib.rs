//! Messaging collaborators for the pixelfan pipeline
//!
//! [`TopicPublisher`] is the fanout seam the notifier publishes through;
//! [`QueueConsumer`] is the at-least-once delivery seam the workers consume
//! from. SNS/SQS backends ship beside in-memory doubles; the in-memory topic
//! fans out to its attached queues, which makes the whole fanout contract
//! testable in-process.

pub mod memory;
pub mod sns;
pub mod sqs;
pub mod traits;

pub use memory::{MemoryQueue, MemoryTopic};
pub use sns::SnsPublisher;
pub use sqs::{SqsQueue, SqsSender};
pub use traits::{QueueConsumer, QueueError, QueueMessage, QueueResult, TopicPublisher};
