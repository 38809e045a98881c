//! Header-only image probe
//!
//! Reads format and dimensions from the image header without a full pixel
//! decode, which is all the metadata worker needs.

use std::io::Cursor;

use image::ImageReader;

use crate::codec::{CodecError, CodecResult, SourceFormat};

/// Result of probing an image header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProbe {
    pub width: u32,
    pub height: u32,
    /// Lowercase format name as the decoder reports it.
    pub format: String,
}

/// Probe format and dimensions from the header. Unrecognized signatures and
/// corrupt headers both fail; the pipeline treats either as a decode failure.
pub fn probe(bytes: &[u8]) -> CodecResult<ImageProbe> {
    let format = SourceFormat::sniff(bytes).ok_or(CodecError::UnsupportedFormat)?;

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    Ok(ImageProbe {
        width,
        height,
        format: format.name().to_string(),
    })
}
