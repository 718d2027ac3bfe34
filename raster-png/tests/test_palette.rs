//! Indexed-color decoding, including the palette-index bounds check and a
//! tRNS alpha lookup.

use raster_png::PngDecoder;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8>
{
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(depth);
    data.push(color);
    data.push(0);
    data.push(0);
    data.push(interlace);
    chunk(b"IHDR", &data)
}

fn zlib_stored(raw: &[u8]) -> Vec<u8>
{
    let mut out = vec![0x78, 0x01, 0x01];
    let len = raw.len() as u16;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(raw);
    out
}

const PALETTE: [[u8; 3]; 4] = [[10, 20, 30], [40, 50, 60], [70, 80, 90], [100, 110, 120]];
const TRNS: [u8; 4] = [128, 255, 0, 200];

fn build(pixel_byte: u8) -> Vec<u8>
{
    let mut plte_data = Vec::with_capacity(12);
    for entry in &PALETTE
    {
        plte_data.extend_from_slice(entry);
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&ihdr(3, 1, 2, 3, 0));
    png.extend_from_slice(&chunk(b"PLTE", &plte_data));
    png.extend_from_slice(&chunk(b"tRNS", &TRNS));
    png.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&[0x00, pixel_byte])));
    png.extend_from_slice(&chunk(b"IEND", &[]));
    png
}

#[test]
fn three_by_one_indexed_depth2_with_trns()
{
    // pixels [2, 0, 3] packed MSB-first into 2-bit fields, padded with zeros
    let png = build(0b10_00_11_00);

    let image = PngDecoder::new(&png).decode().unwrap();

    assert_eq!(image.width, 3);
    assert_eq!(image.height, 1);
    assert_eq!(
        image.rgba,
        vec![0x46, 0x50, 0x5A, 0x00, 0x0A, 0x14, 0x1E, 0x80, 0x64, 0x6E, 0x78, 0xC8]
    );
}

#[test]
fn out_of_range_palette_index_fails_the_whole_decode()
{
    // same packing scheme, but pixel 0 carries index 3 padded to look like
    // index "11" is fine (max valid); flip the low bits of the middle pixel
    // to 3-bits-worth of garbage isn't possible at depth 2 (max index 3 is
    // in range), so instead shrink the palette via a 1-entry PLTE and keep
    // the pixel stream asking for index 2.
    let mut plte_data = Vec::new();
    plte_data.extend_from_slice(&PALETTE[0]);

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&ihdr(3, 1, 2, 3, 0));
    png.extend_from_slice(&chunk(b"PLTE", &plte_data));
    png.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&[0x00, 0b10_00_11_00])));
    png.extend_from_slice(&chunk(b"IEND", &[]));

    assert!(PngDecoder::new(&png).decode().is_err());
}
