/// The 8-byte PNG signature, as a big-endian u64 the same way the stream's
/// first 8 bytes are read.
pub const PNG_SIGNATURE: u64 = 0x8950_4E47_0D0A_1A0A;

/// Adam7 pass table: (h-start, v-start, h-delta, v-delta), 1-indexed in the
/// spec, 0-indexed here.
pub const ADAM7_PASSES: [(usize, usize, usize, usize); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2)
];
