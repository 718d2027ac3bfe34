//! Hand-built, byte-exact PNG streams. No fixture files; every input is
//! assembled here so the expected output can be checked against a value
//! computed by hand rather than against another decoder.

use raster_png::PngDecoder;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0, 0, 0, 0]); // CRC is never checked by this decoder
    out
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8>
{
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(depth);
    data.push(color);
    data.push(0); // compression
    data.push(0); // filter
    data.push(interlace);
    chunk(b"IHDR", &data)
}

/// Zlib-wrap `raw` as a single DEFLATE stored block (BFINAL=1, BTYPE=00).
fn zlib_stored(raw: &[u8]) -> Vec<u8>
{
    let mut out = vec![0x78, 0x01, 0x01];
    let len = raw.len() as u16;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(raw);
    out
}

#[test]
fn two_by_two_rgb_depth8_no_interlace()
{
    // 2x2 RGB, depth 8, no filter: (255,0,0) (0,255,0) / (0,0,255) (255,255,255)
    let raw = [
        0x00, 0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, // row 0: filter + 2 pixels
        0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF // row 1: filter + 2 pixels
    ];

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&ihdr(2, 2, 8, 2, 0));
    png.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&raw)));
    png.extend_from_slice(&chunk(b"IEND", &[]));

    let image = PngDecoder::new(&png).decode().unwrap();

    assert_eq!(image.width, 2);
    assert_eq!(image.height, 2);
    assert_eq!(
        image.rgba,
        vec![
            0xFF, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF
        ]
    );
}

#[test]
fn unknown_magic_is_rejected()
{
    let data = [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];

    assert!(PngDecoder::new(&data).decode().is_err());
}
