//! In-memory storage backends
//!
//! The substitutable fakes for tests and local runs: a blob store keyed by
//! `(bucket, key)` and a metadata table keyed by derived name. Both are cheap
//! to clone and share their contents across clones.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use pixelfan_core::models::MetadataRecord;

use crate::traits::{BlobStore, FetchedObject, MetadataStore, StorageError, StorageResult};

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: Option<String>,
    bytes: Bytes,
}

/// In-memory blob store.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, the way an upload to the real store would.
    pub async fn insert_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
    }

    /// Stored bytes at a key, if present.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.bytes.clone())
    }

    /// All keys currently stored in a bucket, sorted.
    pub async fn keys_in(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject> {
        let objects = self.objects.read().await;
        let stored = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;
        Ok(FetchedObject {
            content_type: stored.content_type.clone(),
            bytes: stored.bytes.clone(),
        })
    }

    async fn put_object(&self, bucket: &str, key: &str, bytes: Bytes) -> StorageResult<()> {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                content_type: None,
                bytes,
            },
        );
        Ok(())
    }
}

/// In-memory metadata table with overwrite semantics.
#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<HashMap<String, MetadataRecord>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, name: &str) -> Option<MetadataRecord> {
        self.records.read().await.get(name).cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn put_record(&self, record: &MetadataRecord) -> StorageResult<()> {
        self.records
            .write()
            .await
            .insert(record.name.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pixelfan_core::models::ImageMetadata;

    fn record(name: &str, width: u32) -> MetadataRecord {
        MetadataRecord {
            name: name.to_string(),
            bucket: "uploads".to_string(),
            metadata: ImageMetadata {
                width,
                height: 1,
                format: "png".to_string(),
                file_size: 1,
                file_name: format!("{name}.png"),
                last_modified: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_get_missing_object_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.get_object("b", "missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = MemoryBlobStore::new();
        store
            .put_object("b", "k", Bytes::from_static(b"data"))
            .await
            .unwrap();
        let fetched = store.get_object("b", "k").await.unwrap();
        assert_eq!(&fetched.bytes[..], b"data");
        assert_eq!(fetched.len(), 4);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryBlobStore::new();
        store
            .put_object("b", "k", Bytes::from_static(b"one"))
            .await
            .unwrap();
        store
            .put_object("b", "k", Bytes::from_static(b"two"))
            .await
            .unwrap();
        assert_eq!(store.object("b", "k").await.unwrap(), Bytes::from("two"));
        assert_eq!(store.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_record_overwrite_last_write_wins() {
        let store = MemoryMetadataStore::new();
        store.put_record(&record("aaa", 100)).await.unwrap();
        store.put_record(&record("aaa", 200)).await.unwrap();
        assert_eq!(store.record_count().await, 1);
        assert_eq!(store.record("aaa").await.unwrap().metadata.width, 200);
    }
}
