//! A hand-built, minimal baseline JPEG: 8x8, one component, quantization
//! table of all ones, and a single all-zero-coefficient block. Every
//! output sample should land on the mid-gray level-shift value.

use raster_jpeg::JpegDecoder;

/// A one-symbol canonical Huffman table: a single codeword of length 1
/// ("0"), mapping straight onto `symbol`.
fn single_symbol_dht(class_and_id: u8, symbol: u8) -> Vec<u8>
{
    let mut data = Vec::new();
    data.push(class_and_id);

    let mut counts = [0u8; 16];
    counts[0] = 1;
    data.extend_from_slice(&counts);
    data.push(symbol);

    let mut out = Vec::new();
    out.extend_from_slice(&0xFFC4u16.to_be_bytes());
    out.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&data);
    out
}

#[test]
fn eight_by_eight_all_gray()
{
    let mut jpeg = Vec::new();
    jpeg.extend_from_slice(&[0xFF, 0xD8]); // SOI

    // DQT: one 8-bit table, all entries 1
    jpeg.extend_from_slice(&[0xFF, 0xDB]);
    jpeg.extend_from_slice(&67u16.to_be_bytes());
    jpeg.push(0x00); // precision 0, table id 0
    jpeg.extend_from_slice(&[1u8; 64]);

    // SOF0: 8x8, one component, no subsampling
    jpeg.extend_from_slice(&[0xFF, 0xC0]);
    jpeg.extend_from_slice(&11u16.to_be_bytes());
    jpeg.push(8); // precision
    jpeg.extend_from_slice(&8u16.to_be_bytes()); // height
    jpeg.extend_from_slice(&8u16.to_be_bytes()); // width
    jpeg.push(1); // num components
    jpeg.extend_from_slice(&[1, 0x11, 0]); // id, h/v=1/1, quant table 0

    // DHT: DC table 0 (class 0) with the lone symbol being category 0
    jpeg.extend_from_slice(&single_symbol_dht(0x00, 0x00));
    // DHT: AC table 0 (class 1) with the lone symbol being EOB (run 0, size 0)
    jpeg.extend_from_slice(&single_symbol_dht(0x10, 0x00));

    // SOS
    jpeg.extend_from_slice(&[0xFF, 0xDA]);
    jpeg.extend_from_slice(&8u16.to_be_bytes());
    jpeg.push(1); // num scan components
    jpeg.extend_from_slice(&[1, 0x00]); // selector, DC/AC table ids
    jpeg.extend_from_slice(&[0x00, 0x3F, 0x00]); // Ss, Se, Ah/Al

    // entropy-coded data: DC symbol "0" then AC EOB "0", rest padded with 1s
    jpeg.push(0b0011_1111);
    jpeg.extend_from_slice(&[0xFF, 0xD9]); // EOI

    let image = JpegDecoder::new(&jpeg).decode().unwrap();

    assert_eq!(image.width, 8);
    assert_eq!(image.height, 8);
    assert!(image.rgba.chunks_exact(4).all(|p| p == [0x80, 0x80, 0x80, 0xFF]));
}
