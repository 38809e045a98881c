//! Metadata record model
//!
//! One record per source image, keyed by the derived name and overwritten on
//! every reprocess (last write wins).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Image attributes extracted by the metadata worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Decoder-reported format name, lowercase (`jpeg`, `png`, `gif`).
    pub format: String,
    /// Byte length of the fetched source object.
    pub file_size: u64,
    /// Basename of the source key, extension kept.
    pub file_name: String,
    /// Timestamp of the fetched copy.
    pub last_modified: DateTime<Utc>,
}

impl ImageMetadata {
    /// The record's attribute map as string pairs, in the shape the key-value
    /// store persists (every value stringified, RFC3339 timestamp).
    pub fn as_string_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("format", self.format.clone()),
            ("file_size", self.file_size.to_string()),
            ("file_name", self.file_name.clone()),
            (
                "last_modified",
                self.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]
    }
}

/// A full metadata record, keyed by derived name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub name: String,
    pub bucket: String,
    pub metadata: ImageMetadata,
}
