use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::{CodecError, CodecResult, EncodeOptions, ImageCodec, SourceFormat};

pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn format(&self) -> SourceFormat {
        SourceFormat::Png
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<DynamicImage> {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    // PNG is lossless; quality does not apply.
    fn encode(&self, image: &DynamicImage, _options: &EncodeOptions) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
