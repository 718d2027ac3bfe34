use std::fmt::{Debug, Formatter};

/// Everything that can go wrong decompressing a zlib/DEFLATE payload.
pub enum InflateErrors
{
    /// CMF low nibble was not 8, or a preset dictionary was requested.
    BadZlibHeader,
    /// A code-length, literal/length, or distance Huffman table was
    /// malformed (overfull, or referenced a symbol with no code).
    BadHuffmanTable,
    /// BTYPE was 3.
    BadBlockType,
    /// A stored block's LEN/NLEN did not satisfy `LEN ^ NLEN == 0xFFFF`.
    BadStoredBlockLength,
    /// A back-reference pointed before the start of the output buffer.
    DistanceTooFar,
    /// A literal or match copy would write past the declared output size.
    OutputOverrun,
    /// The input ended before a block's BFINAL=1 was seen, or before the
    /// declared output size was filled.
    UnexpectedEof,
    /// Decompression finished (BFINAL block consumed) without filling the
    /// declared output size.
    OutputUnderfilled
}

impl Debug for InflateErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::BadZlibHeader => writeln!(f, "invalid zlib header"),
            Self::BadHuffmanTable => writeln!(f, "invalid Huffman table in DEFLATE stream"),
            Self::BadBlockType => writeln!(f, "reserved DEFLATE block type (BTYPE=3)"),
            Self::BadStoredBlockLength =>
            {
                writeln!(f, "stored block LEN/NLEN mismatch")
            }
            Self::DistanceTooFar => writeln!(f, "back-reference distance before start of output"),
            Self::OutputOverrun => writeln!(f, "decompressed output exceeds declared size"),
            Self::UnexpectedEof => writeln!(f, "input truncated mid-stream"),
            Self::OutputUnderfilled => writeln!(f, "input exhausted before output was filled")
        }
    }
}
