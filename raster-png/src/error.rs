use std::fmt::{Debug, Formatter};

use raster_core::bytestream::OutOfBounds;
use raster_inflate::InflateErrors;

pub enum PngErrors
{
    BadSignature,
    GenericStatic(&'static str),
    Generic(String),
    ZlibDecodeErrors(InflateErrors),
    EmptyPalette,
    TooSmallOutput(usize, usize),
    PaletteIndexOutOfRange(usize, usize)
}

impl Debug for PngErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::BadSignature => writeln!(f, "bad PNG signature, not a png"),
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::ZlibDecodeErrors(err) => writeln!(f, "error decoding IDAT chunks: {err:?}"),
            Self::EmptyPalette => writeln!(f, "indexed image has no PLTE chunk"),
            Self::TooSmallOutput(expected, found) => write!(
                f,
                "too small output, expected buffer with at least {expected} bytes but got {found}"
            ),
            Self::PaletteIndexOutOfRange(index, palette_len) => writeln!(
                f,
                "palette index {index} is out of range for a palette of {palette_len} entries"
            )
        }
    }
}

impl From<&'static str> for PngErrors
{
    fn from(val: &'static str) -> Self
    {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngErrors
{
    fn from(val: String) -> Self
    {
        Self::Generic(val)
    }
}

impl From<InflateErrors> for PngErrors
{
    fn from(val: InflateErrors) -> Self
    {
        Self::ZlibDecodeErrors(val)
    }
}

impl From<OutOfBounds> for PngErrors
{
    fn from(_: OutOfBounds) -> Self
    {
        Self::GenericStatic("unexpected end of PNG stream")
    }
}
