//! Marker bytes and fixed lookup tables used by the segment parser and the
//! per-block decode pipeline.

pub const MARKER_SOI: u8 = 0xD8;
pub const MARKER_EOI: u8 = 0xD9;
pub const MARKER_SOF0: u8 = 0xC0;
pub const MARKER_SOS: u8 = 0xDA;
pub const MARKER_DQT: u8 = 0xDB;
pub const MARKER_DHT: u8 = 0xC4;
pub const MARKER_DRI: u8 = 0xDD;
pub const MARKER_RST0: u8 = 0xD0;
pub const MARKER_RST7: u8 = 0xD7;

/// True for every marker that isn't SOFn, so that an unsupported SOF variant
/// (progressive, lossless, ...) is reported by name rather than silently
/// misread as SOF0.
pub const fn is_sof_marker(marker: u8) -> bool
{
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Maps a zigzag-order coefficient index to its position in an 8x8 block
/// stored in natural (row-major) order.
pub const UN_ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10,
    17, 24, 32, 25, 18, 11, 4, 5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6, 7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63
];
