use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use super::{CodecError, CodecResult, EncodeOptions, ImageCodec, SourceFormat};

/// JPEG decode/encode. Encoding drops any alpha channel first; JPEG has no
/// alpha, and converting up front keeps the output deterministic regardless
/// of the source's color type.
pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    fn format(&self) -> SourceFormat {
        SourceFormat::Jpeg
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<DynamicImage> {
        image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, options: &EncodeOptions) -> CodecResult<Vec<u8>> {
        let rgb = image.to_rgb8();
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, options.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
