use std::fmt::{Debug, Formatter};

use raster_core::bytestream::OutOfBounds;

use crate::constants::PSD_SIGNATURE;

pub enum PsdErrors
{
    WrongMagicBytes(u32),
    UnsupportedFileVersion(u16),
    UnsupportedChannelCount(u16),
    UnsupportedBitDepth(u16),
    UnsupportedColorMode(u16),
    UnsupportedDepthForRawRead(u16),
    UnknownCompression(u16),
    LargeDimensions(usize, usize),
    Generic(&'static str)
}

impl Debug for PsdErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::WrongMagicBytes(bytes) =>
            {
                writeln!(
                    f,
                    "expected magic {:?} but found {:?}, not a PSD document",
                    PSD_SIGNATURE.to_be_bytes(),
                    bytes.to_be_bytes()
                )
            }
            Self::UnsupportedFileVersion(version) =>
            {
                writeln!(f, "unsupported PSD version {version}, only version 1 is supported")
            }
            Self::UnsupportedChannelCount(channels) =>
            {
                writeln!(f, "unsupported channel count {channels}, only 3 (RGB) is supported")
            }
            Self::UnsupportedBitDepth(depth) =>
            {
                writeln!(f, "unsupported bit depth {depth}, valid depths are 1, 8, 16 and 32")
            }
            Self::UnsupportedColorMode(mode) =>
            {
                writeln!(f, "unsupported color mode {mode}, only 3 (RGB) is supported")
            }
            Self::UnsupportedDepthForRawRead(depth) =>
            {
                writeln!(f, "bit depth {depth} is recognized but raw sample expansion only supports 8-bit channels")
            }
            Self::UnknownCompression(code) =>
            {
                writeln!(f, "unsupported compression code {code}, only 0 (raw) is supported")
            }
            Self::LargeDimensions(found, max) =>
            {
                writeln!(f, "dimension {found} exceeds the configured maximum of {max}")
            }
        }
    }
}

impl From<&'static str> for PsdErrors
{
    fn from(reason: &'static str) -> Self
    {
        Self::Generic(reason)
    }
}

impl From<OutOfBounds> for PsdErrors
{
    fn from(_: OutOfBounds) -> Self
    {
        Self::Generic("unexpected end of PSD stream")
    }
}
