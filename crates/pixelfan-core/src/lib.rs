//! Core domain types for the pixelfan pipeline
//!
//! This crate holds the shared vocabulary of the pipeline: the upload event
//! that fans out to every worker, the metadata record, artifact naming, the
//! error taxonomy, and configuration. It has no I/O of its own; storage and
//! messaging backends live in their own crates and depend on this one.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;

pub use config::Config;
pub use error::{IoOp, PipelineError, Stage};
pub use models::{ImageMetadata, MetadataRecord, S3Event, S3Record, UploadEvent};
