pub mod event;
pub mod metadata;

pub use event::{S3Event, S3Record, UploadEvent};
pub use metadata::{ImageMetadata, MetadataRecord};
