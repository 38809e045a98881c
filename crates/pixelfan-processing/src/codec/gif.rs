use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::{CodecError, CodecResult, EncodeOptions, ImageCodec, SourceFormat};

/// GIF decode/encode. Decoding an animated GIF yields its first frame; the
/// pipeline treats every source as a single still image.
pub struct GifCodec;

impl ImageCodec for GifCodec {
    fn format(&self) -> SourceFormat {
        SourceFormat::Gif
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<DynamicImage> {
        image::load_from_memory_with_format(bytes, ImageFormat::Gif)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, _options: &EncodeOptions) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Gif)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
