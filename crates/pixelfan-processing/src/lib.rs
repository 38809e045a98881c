//! Image processing for the pixelfan pipeline
//!
//! Codec registry (decode/encode per format, selected by content sniffing),
//! header-only probing, and aspect-preserving resize. No I/O: callers hand in
//! bytes and get bytes back.

pub mod codec;
pub mod probe;
pub mod resize;

pub use codec::{CodecError, CodecRegistry, CodecResult, EncodeOptions, ImageCodec, SourceFormat};
pub use probe::{probe, ImageProbe};
pub use resize::{resize_to_width, target_dimensions};
