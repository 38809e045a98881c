//! Storage collaborators for the pixelfan pipeline
//!
//! Two trait seams: [`BlobStore`] for the object store holding sources and
//! artifacts, and [`MetadataStore`] for the overwrite-semantics key-value
//! table. Cloud backends (S3, DynamoDB) ship beside in-memory backends so the
//! workers can be exercised without cloud credentials.

pub mod dynamo;
pub mod memory;
pub mod s3;
pub mod traits;

pub use dynamo::DynamoMetadataStore;
pub use memory::{MemoryBlobStore, MemoryMetadataStore};
pub use s3::S3BlobStore;
pub use traits::{BlobStore, FetchedObject, MetadataStore, StorageError, StorageResult};
