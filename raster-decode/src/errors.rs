use std::fmt::{Debug, Formatter};

use raster_jpeg::JpegErrors;
use raster_png::PngErrors;
use raster_psd::PsdErrors;

/// Every failure class a frontend can produce, wrapped behind one type so
/// that callers matching on format never need to know which frontend
/// handled their input.
pub enum DecodeError
{
    Png(PngErrors),
    Jpeg(JpegErrors),
    Psd(PsdErrors),
    /// The leading bytes matched none of PNG, JPEG or PSD.
    UnknownFormat
}

impl Debug for DecodeError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Png(err) => writeln!(f, "{err:?}"),
            Self::Jpeg(err) => writeln!(f, "{err:?}"),
            Self::Psd(err) => writeln!(f, "{err:?}"),
            Self::UnknownFormat => writeln!(f, "input does not match any recognized image format")
        }
    }
}

impl From<PngErrors> for DecodeError
{
    fn from(err: PngErrors) -> Self
    {
        Self::Png(err)
    }
}

impl From<JpegErrors> for DecodeError
{
    fn from(err: JpegErrors) -> Self
    {
        Self::Jpeg(err)
    }
}

impl From<PsdErrors> for DecodeError
{
    fn from(err: PsdErrors) -> Self
    {
        Self::Psd(err)
    }
}
