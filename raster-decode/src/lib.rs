//! Magic-byte dispatcher over the three supported image formats.
//!
//! [`decode`] is the one entry point: it sniffs the leading bytes, hands
//! the whole buffer to the matching frontend, and returns that frontend's
//! fully-expanded RGBA8 image. Every subsequent validation is the
//! frontend's own responsibility; this crate only picks which one to call.

use log::{debug, warn};
use raster_core::image::DecodedImage;
use raster_core::options::DecoderOptions;
use raster_jpeg::JpegDecoder;
use raster_png::PngDecoder;
use raster_psd::PsdDecoder;

pub use crate::errors::DecodeError;

mod errors;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PSD_SIGNATURE: [u8; 4] = *b"8BPS";

/// Decode a PNG, baseline JPEG or uncompressed-RGB PSD buffer into RGBA8.
///
/// Returns [`DecodeError::UnknownFormat`] if the leading bytes match none
/// of the three recognized signatures.
pub fn decode(data: &[u8]) -> Result<DecodedImage, DecodeError>
{
    decode_with_options(data, DecoderOptions::default())
}

pub fn decode_with_options(data: &[u8], options: DecoderOptions) -> Result<DecodedImage, DecodeError>
{
    if data.starts_with(&PNG_SIGNATURE)
    {
        debug!("dispatching to the PNG frontend");
        return Ok(PngDecoder::new_with_options(data, options).decode()?);
    }

    if data.starts_with(&PSD_SIGNATURE)
    {
        debug!("dispatching to the PSD frontend");
        return Ok(PsdDecoder::new_with_options(data, options).decode()?);
    }

    if data.first() == Some(&0xFF)
    {
        debug!("dispatching to the JPEG frontend");
        return Ok(JpegDecoder::new_with_options(data, options).decode()?);
    }

    warn!("input matched no recognized image format");
    Err(DecodeError::UnknownFormat)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn unrecognized_magic_is_reported_as_unknown_format()
    {
        let data = [0x00, 0x01, 0x02, 0x03];
        assert!(matches!(decode(&data), Err(DecodeError::UnknownFormat)));
    }

    #[test]
    fn truncated_png_signature_reaches_the_png_frontend_and_fails_there()
    {
        let mut data = PNG_SIGNATURE.to_vec();
        data.truncate(4);

        // Too short to match the 8-byte PNG signature at all, so this
        // falls through to "unknown format" rather than reaching the PNG
        // frontend.
        assert!(matches!(decode(&data), Err(DecodeError::UnknownFormat)));
    }
}
