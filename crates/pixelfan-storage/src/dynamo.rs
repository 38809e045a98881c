//! DynamoDB metadata store
//!
//! Writes the `{name, bucket, metadata{...}}` item with plain string
//! attributes. `put_item` overwrites, which is exactly the last-write-wins
//! contract the record needs.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use pixelfan_core::models::MetadataRecord;

use crate::traits::{MetadataStore, StorageError, StorageResult};

pub struct DynamoMetadataStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoMetadataStore {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        DynamoMetadataStore { client, table_name }
    }

    fn build_item(record: &MetadataRecord) -> HashMap<String, AttributeValue> {
        let metadata: HashMap<String, AttributeValue> = record
            .metadata
            .as_string_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), AttributeValue::S(v)))
            .collect();

        HashMap::from([
            ("name".to_string(), AttributeValue::S(record.name.clone())),
            (
                "bucket".to_string(),
                AttributeValue::S(record.bucket.clone()),
            ),
            ("metadata".to_string(), AttributeValue::M(metadata)),
        ])
    }
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    async fn put_record(&self, record: &MetadataRecord) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::build_item(record)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    table = %self.table_name,
                    name = %record.name,
                    "metadata record write failed"
                );
                StorageError::RecordWriteFailed(e.to_string())
            })?;

        tracing::info!(
            table = %self.table_name,
            name = %record.name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "metadata record written"
        );

        Ok(())
    }
}
