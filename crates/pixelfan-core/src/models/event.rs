//! Upload events and the blob-store notification document
//!
//! [`UploadEvent`] is the only payload that travels through the fanout topic
//! and the worker queues. The notifier builds it from the blob store's own
//! notification document, whose object keys arrive URL-encoded (space as `+`,
//! the rest percent-escaped) and must be decoded before use.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// The fanout payload: one per triggering blob write, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    pub bucket: String,
    pub key: String,
}

impl UploadEvent {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        UploadEvent {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a queue message body. Malformed JSON is a serialization failure,
    /// terminal for that message.
    pub fn from_json(body: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(body).map_err(PipelineError::from)
    }
}

/// S3-style object-created notification document, as delivered to the
/// notifier's queue.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3Record>,
}

impl S3Event {
    pub fn from_json(body: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(body).map_err(PipelineError::from)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Record {
    pub s3: S3Entity,
    #[serde(rename = "eventName", default)]
    pub event_name: String,
}

impl S3Record {
    /// Object key with the notification's URL-encoding undone.
    pub fn decoded_key(&self) -> Result<String, PipelineError> {
        // S3 event notifications encode spaces as '+' before percent-escaping
        // the rest.
        let plus_decoded = self.s3.object.key.replace('+', " ");
        urlencoding::decode(&plus_decoded)
            .map(|cow| cow.into_owned())
            .map_err(PipelineError::serialization)
    }

    pub fn bucket_name(&self) -> &str {
        &self.s3.bucket.name
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_event_roundtrip() {
        let event = UploadEvent::new("uploads", "photos/aaa.png");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(UploadEvent::from_json(&json).unwrap(), event);
    }

    #[test]
    fn test_upload_event_wire_shape() {
        let event = UploadEvent::from_json(r#"{"bucket":"b","key":"k.jpg"}"#).unwrap();
        assert_eq!(event.bucket, "b");
        assert_eq!(event.key, "k.jpg");
    }

    #[test]
    fn test_upload_event_malformed_body() {
        let err = UploadEvent::from_json("{not json").unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_s3_event_parse_and_key_decoding() {
        let body = r#"{
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "uploads"},
                    "object": {"key": "photos/my+photo%281%29.png", "size": 1234}
                }
            }]
        }"#;
        let event = S3Event::from_json(body).unwrap();
        assert_eq!(event.records.len(), 1);
        let record = &event.records[0];
        assert_eq!(record.bucket_name(), "uploads");
        assert_eq!(record.decoded_key().unwrap(), "photos/my photo(1).png");
    }

    #[test]
    fn test_s3_record_plain_key_unchanged() {
        let body = r#"{"Records":[{"s3":{"bucket":{"name":"b"},"object":{"key":"a/b.png"}}}]}"#;
        let event = S3Event::from_json(body).unwrap();
        assert_eq!(event.records[0].decoded_key().unwrap(), "a/b.png");
    }
}
