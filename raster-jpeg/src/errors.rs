use std::fmt::{Debug, Formatter};

use raster_core::bytestream::OutOfBounds;

pub enum JpegErrors
{
    GenericStatic(&'static str),
    Generic(String),
    /// The SOF marker seen wasn't SOF0 (baseline).
    UnsupportedSof(u8),
    UnsupportedPrecision(u8),
    TooManyComponents(u8)
}

impl Debug for JpegErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::UnsupportedSof(marker) =>
            {
                writeln!(f, "unsupported start-of-frame marker 0xFF{marker:02X}, only baseline (SOF0) is supported")
            }
            Self::UnsupportedPrecision(p) => writeln!(f, "unsupported sample precision {p}, only 8 is supported"),
            Self::TooManyComponents(n) => writeln!(f, "{n} components, only 1 or 3 are supported")
        }
    }
}

impl From<&'static str> for JpegErrors
{
    fn from(val: &'static str) -> Self
    {
        Self::GenericStatic(val)
    }
}

impl From<String> for JpegErrors
{
    fn from(val: String) -> Self
    {
        Self::Generic(val)
    }
}

impl From<OutOfBounds> for JpegErrors
{
    fn from(_: OutOfBounds) -> Self
    {
        Self::GenericStatic("unexpected end of JPEG stream")
    }
}
