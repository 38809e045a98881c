//! Storage abstraction traits
//!
//! All storage backends implement these traits; the workers take them as
//! `Arc<dyn ...>` so tests can substitute in-memory fakes.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use pixelfan_core::error::{IoOp, PipelineError};
use pixelfan_core::models::MetadataRecord;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("record write failed: {0}")]
    RecordWriteFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        let op = match &err {
            StorageError::NotFound { .. }
            | StorageError::DownloadFailed(_)
            | StorageError::ConfigError(_) => IoOp::Fetch,
            StorageError::UploadFailed(_) => IoOp::Upload,
            StorageError::RecordWriteFailed(_) => IoOp::Record,
        };
        PipelineError::transient(op, err)
    }
}

/// A source object fetched fully into memory for one message's processing.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl FetchedObject {
    /// Byte length of the fetched content.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Blob store collaborator: get/put objects by bucket and key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch an object fully into memory.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject>;

    /// Write an object, overwriting whatever is at the key.
    async fn put_object(&self, bucket: &str, key: &str, bytes: Bytes) -> StorageResult<()>;
}

/// Key-value store collaborator with overwrite-semantics writes.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Persist a record keyed by its derived name, overwriting any prior one.
    async fn put_record(&self, record: &MetadataRecord) -> StorageResult<()>;
}
