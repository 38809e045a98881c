//! Codec registry
//!
//! Formats are registered explicitly and selected by sniffing the content's
//! magic bytes, so adding a format means registering a codec, not editing the
//! workers. Each codec owns both directions: decode its format into a pixel
//! image, and encode a pixel image back into its format.

mod gif;
mod jpeg;
mod png;

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use thiserror::Error;

use pixelfan_core::constants::JPEG_QUALITY;
use pixelfan_core::error::PipelineError;

pub use gif::GifCodec;
pub use jpeg::JpegCodec;
pub use png::PngCodec;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unrecognized image signature")]
    UnsupportedFormat,

    #[error("no codec registered for {0}")]
    NoCodec(&'static str),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

impl From<CodecError> for PipelineError {
    fn from(err: CodecError) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

/// Source formats the pipeline recognizes, identified by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

impl SourceFormat {
    /// Decoder-reported format name, lowercase.
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::Gif => "gif",
        }
    }

    /// Identify a format from the content's leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(SourceFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(SourceFormat::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(SourceFormat::Gif)
        } else {
            None
        }
    }
}

/// Encode parameters. Only quality for now; every artifact in this pipeline
/// uses maximum quality.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub quality: u8,
}

impl EncodeOptions {
    pub fn max_quality() -> Self {
        EncodeOptions {
            quality: JPEG_QUALITY,
        }
    }
}

/// One format's decode/encode capability.
pub trait ImageCodec: Send + Sync {
    fn format(&self) -> SourceFormat;

    fn decode(&self, bytes: &[u8]) -> CodecResult<DynamicImage>;

    fn encode(&self, image: &DynamicImage, options: &EncodeOptions) -> CodecResult<Vec<u8>>;
}

/// Registry of codecs indexed by source format.
pub struct CodecRegistry {
    codecs: HashMap<SourceFormat, Arc<dyn ImageCodec>>,
}

impl CodecRegistry {
    /// Empty registry. Most callers want [`CodecRegistry::with_defaults`].
    pub fn new() -> Self {
        CodecRegistry {
            codecs: HashMap::new(),
        }
    }

    /// Registry with the pipeline's stock formats: JPEG, PNG, GIF.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JpegCodec));
        registry.register(Arc::new(PngCodec));
        registry.register(Arc::new(GifCodec));
        registry
    }

    pub fn register(&mut self, codec: Arc<dyn ImageCodec>) {
        self.codecs.insert(codec.format(), codec);
    }

    pub fn codec_for(&self, format: SourceFormat) -> CodecResult<&Arc<dyn ImageCodec>> {
        self.codecs
            .get(&format)
            .ok_or(CodecError::NoCodec(format.name()))
    }

    /// Sniff the content and decode it with the matching codec.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<(DynamicImage, SourceFormat)> {
        let format = SourceFormat::sniff(bytes).ok_or(CodecError::UnsupportedFormat)?;
        let image = self.codec_for(format)?.decode(bytes)?;
        Ok((image, format))
    }

    /// Encode a pixel image in the given format.
    pub fn encode(
        &self,
        format: SourceFormat,
        image: &DynamicImage,
        options: &EncodeOptions,
    ) -> CodecResult<Vec<u8>> {
        self.codec_for(format)?.encode(image, options)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
