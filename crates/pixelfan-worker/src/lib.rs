//! Pixelfan workers
//!
//! The upload notifier and the three derived-artifact workers, plus the batch
//! dispatch and queue polling machinery they share. Every worker takes its
//! collaborators as trait objects at construction, so the same code runs
//! against cloud backends in the daemon and in-memory backends in tests.

pub mod batch;
pub mod converter;
pub mod handler;
pub mod metadata;
pub mod notifier;
pub mod resizer;
pub mod runner;

pub use batch::{dispatch_batch, Disposition, MessageOutcome};
pub use converter::ConverterWorker;
pub use handler::MessageHandler;
pub use metadata::MetadataWorker;
pub use notifier::UploadNotifier;
pub use resizer::ResizerWorker;
pub use runner::QueueRunner;
