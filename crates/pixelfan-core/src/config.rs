//! Configuration module
//!
//! Env-var driven configuration for the daemon. Queue URLs, the fanout topic,
//! and the metadata table are required; everything else has a default.

use std::env;

use anyhow::Context;

const DEFAULT_RECEIVE_BATCH_SIZE: i32 = 10;
const DEFAULT_RECEIVE_WAIT_SECS: i32 = 10;
const DEFAULT_POLL_IDLE_MS: u64 = 1000;

/// Daemon configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub aws_region: String,
    /// Custom endpoint for S3-compatible providers (e.g. MinIO).
    pub s3_endpoint: Option<String>,
    /// Fanout topic the notifier publishes upload events to.
    pub upload_topic_arn: String,
    /// Key-value table the metadata worker writes records to.
    pub metadata_table: String,
    /// Queue carrying blob-store notification documents for the notifier.
    pub notification_queue_url: String,
    /// Per-worker queues fed by the fanout topic.
    pub metadata_queue_url: String,
    pub converter_queue_url: String,
    pub resizer_queue_url: String,
    /// Optional sink for messages whose failures can never succeed on retry.
    pub dead_letter_queue_url: Option<String>,
    /// Max messages per receive call.
    pub receive_batch_size: i32,
    /// Long-poll wait per receive call.
    pub receive_wait_secs: i32,
    /// Sleep between polls when a receive returns nothing.
    pub poll_idle_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config {
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            upload_topic_arn: env::var("UPLOAD_TOPIC_ARN")
                .context("UPLOAD_TOPIC_ARN must be set")?,
            metadata_table: env::var("METADATA_TABLE").context("METADATA_TABLE must be set")?,
            notification_queue_url: env::var("NOTIFICATION_QUEUE_URL")
                .context("NOTIFICATION_QUEUE_URL must be set")?,
            metadata_queue_url: env::var("METADATA_QUEUE_URL")
                .context("METADATA_QUEUE_URL must be set")?,
            converter_queue_url: env::var("CONVERTER_QUEUE_URL")
                .context("CONVERTER_QUEUE_URL must be set")?,
            resizer_queue_url: env::var("RESIZER_QUEUE_URL")
                .context("RESIZER_QUEUE_URL must be set")?,
            dead_letter_queue_url: env::var("DEAD_LETTER_QUEUE_URL").ok(),
            receive_batch_size: env::var("RECEIVE_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RECEIVE_BATCH_SIZE),
            receive_wait_secs: env::var("RECEIVE_WAIT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RECEIVE_WAIT_SECS),
            poll_idle_ms: env::var("POLL_IDLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_POLL_IDLE_MS),
        })
    }
}
