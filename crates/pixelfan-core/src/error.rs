//! Pipeline error taxonomy
//!
//! Three kinds of failure flow through the workers, and they differ in what a
//! retry can accomplish:
//!
//! - [`PipelineError::Serialization`] — malformed message body. Redelivery
//!   replays the same bytes; it can never succeed.
//! - [`PipelineError::Decode`] — corrupt or unsupported image content. Same
//!   bytes, same outcome; never succeeds on retry.
//! - [`PipelineError::TransientIo`] — a storage, queue, or publish call
//!   failed. Safe to retry via redelivery.
//!
//! [`PipelineError::is_retryable`] is the single classification point; the
//! queue runner uses it to decide between leaving a message for redelivery
//! and routing it to a dead-letter sink.

use std::fmt;

use thiserror::Error;

/// The I/O operation a transient failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Fetch,
    Upload,
    Record,
    Publish,
    Receive,
    Task,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoOp::Fetch => "fetch",
            IoOp::Upload => "upload",
            IoOp::Record => "record write",
            IoOp::Publish => "publish",
            IoOp::Receive => "receive",
            IoOp::Task => "task",
        };
        f.write_str(s)
    }
}

/// Per-message processing stage. Every worker moves a message through the
/// same progression; a failure is reported with the stage it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Parsed,
    Fetching,
    Decoding,
    Transforming,
    Uploading,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Received => "received",
            Stage::Parsed => "parsed",
            Stage::Fetching => "fetching",
            Stage::Decoding => "decoding",
            Stage::Transforming => "transforming",
            Stage::Uploading => "uploading",
            Stage::Complete => "complete",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed message body.
    #[error("malformed message body: {0}")]
    Serialization(String),

    /// Corrupt or unsupported image bytes.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// A storage/queue/publish call failed.
    #[error("transient {op} failure: {detail}")]
    TransientIo { op: IoOp, detail: String },

    /// One or more resize sub-tasks failed. The message as a whole is failed;
    /// sibling artifacts that did upload do not mask this.
    #[error("resize fan-out failed for [{}]: {detail}", .failed_sizes.join(", "))]
    ResizeFanout {
        failed_sizes: Vec<String>,
        detail: String,
        retryable: bool,
    },
}

impl PipelineError {
    pub fn serialization(err: impl fmt::Display) -> Self {
        PipelineError::Serialization(err.to_string())
    }

    pub fn decode(err: impl fmt::Display) -> Self {
        PipelineError::Decode(err.to_string())
    }

    pub fn transient(op: IoOp, err: impl fmt::Display) -> Self {
        PipelineError::TransientIo {
            op,
            detail: err.to_string(),
        }
    }

    /// Aggregate per-size resize failures into one error for the message.
    /// Retryable iff any underlying failure is.
    pub fn resize_fanout(failures: Vec<(String, PipelineError)>) -> Self {
        let retryable = failures.iter().any(|(_, e)| e.is_retryable());
        let failed_sizes: Vec<String> = failures.iter().map(|(name, _)| name.clone()).collect();
        let detail = failures
            .iter()
            .map(|(name, e)| format!("{}: {}", name, e))
            .collect::<Vec<_>>()
            .join("; ");
        PipelineError::ResizeFanout {
            failed_sizes,
            detail,
            retryable,
        }
    }

    /// Whether redelivering the message can succeed. Serialization and decode
    /// failures replay identically and are dead-letter candidates.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Serialization(_) | PipelineError::Decode(_) => false,
            PipelineError::TransientIo { .. } => true,
            PipelineError::ResizeFanout { retryable, .. } => *retryable,
        }
    }

    /// The processing stage this failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Serialization(_) => Stage::Parsed,
            PipelineError::Decode(_) => Stage::Decoding,
            PipelineError::TransientIo { op, .. } => match op {
                IoOp::Fetch | IoOp::Receive => Stage::Fetching,
                IoOp::Upload | IoOp::Record | IoOp::Publish => Stage::Uploading,
                IoOp::Task => Stage::Transforming,
            },
            PipelineError::ResizeFanout { .. } => Stage::Transforming,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_is_not_retryable() {
        let err = PipelineError::serialization("unexpected end of input");
        assert!(!err.is_retryable());
        assert_eq!(err.stage(), Stage::Parsed);
    }

    #[test]
    fn test_decode_is_not_retryable() {
        let err = PipelineError::decode("not an image");
        assert!(!err.is_retryable());
        assert_eq!(err.stage(), Stage::Decoding);
    }

    #[test]
    fn test_transient_io_is_retryable() {
        let err = PipelineError::transient(IoOp::Fetch, "connection reset");
        assert!(err.is_retryable());
        assert_eq!(err.stage(), Stage::Fetching);

        let err = PipelineError::transient(IoOp::Upload, "503");
        assert_eq!(err.stage(), Stage::Uploading);
    }

    #[test]
    fn test_resize_fanout_lists_failed_sizes() {
        let err = PipelineError::resize_fanout(vec![
            (
                "thumbnail".to_string(),
                PipelineError::transient(IoOp::Upload, "timeout"),
            ),
            (
                "large".to_string(),
                PipelineError::transient(IoOp::Upload, "timeout"),
            ),
        ]);
        assert!(err.is_retryable());
        let msg = err.to_string();
        assert!(msg.contains("thumbnail"));
        assert!(msg.contains("large"));
        assert!(!msg.contains("medium"));
    }

    #[test]
    fn test_resize_fanout_retryability_follows_causes() {
        let err = PipelineError::resize_fanout(vec![(
            "medium".to_string(),
            PipelineError::decode("bad pixels"),
        )]);
        assert!(!err.is_retryable());
    }
}
