//! Shared kernel for the `raster-decode` family of image decoders.
//!
//! Every format frontend (`raster-png`, `raster-jpeg`, `raster-psd`) reads
//! its input through [`bytestream::ZByteReader`], builds Huffman tables
//! through [`huffman::HuffmanTable`], and rescales samples through
//! [`sample`]. None of this crate allocates an image buffer itself; it is
//! pure plumbing.

pub mod bytestream;
pub mod colorspace;
pub mod huffman;
pub mod image;
pub mod options;
pub mod sample;
