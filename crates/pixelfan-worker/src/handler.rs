//! Message handler seam
//!
//! One trait between the queue machinery and the components that do the work.
//! Each implementor owns parsing its own body shape (the workers expect an
//! upload event, the notifier a blob-store notification document), so a
//! malformed body surfaces as a serialization failure like any other.

use async_trait::async_trait;

use pixelfan_core::error::PipelineError;

#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Short name for logging (`notifier`, `metadata`, `convert`, `resize`).
    fn name(&self) -> &'static str;

    /// Process one message body to completion. Ok means every side effect of
    /// this message is durably written and the message may be acked.
    async fn handle(&self, body: &str) -> Result<(), PipelineError>;
}
