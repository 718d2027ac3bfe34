//! A baseline (SOF0) JPEG decoder that expands every supported frame to
//! RGBA8. Progressive, lossless, hierarchical and arithmetic-coded frames
//! are rejected rather than partially decoded.

pub use decoder::JpegDecoder;
pub use errors::JpegErrors;

mod color_convert;
mod constants;
mod decoder;
mod errors;
mod idct;
