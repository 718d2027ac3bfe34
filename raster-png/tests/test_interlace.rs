//! Adam7 interlacing: a 2x2 RGB image exercises passes 1, 6 and 7 (the only
//! three that carry any pixels at this size), then fully reassembles.

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

#[test]
fn two_by_two_adam7_round_trips()
{
    // (0,0)=(10,20,30)  (1,0)=(40,50,60)
    // (0,1)=(70,80,90)  (1,1)=(100,110,120)
    //
    // At 2x2, Adam7 pass 1 carries (0,0), pass 6 carries (1,0), and pass 7
    // carries (0,1) and (1,1); passes 2-5 are empty at this size.
    let pass1 = [0x00, 0x0A, 0x14, 0x1E];
    let pass6 = [0x00, 0x28, 0x32, 0x3C];
    let pass7 = [0x00, 0x46, 0x50, 0x5A, 0x64, 0x6E, 0x78];

    let mut raw = Vec::new();
    raw.extend_from_slice(&pass1);
    raw.extend_from_slice(&pass6);
    raw.extend_from_slice(&pass7);

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&ihdr(2, 2, 8, 2, 1));
    png.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&raw)));
    png.extend_from_slice(&chunk(b"IEND", &[]));

    let image = PngDecoder::new(&png).decode().unwrap();

    assert_eq!(image.width, 2);
    assert_eq!(image.height, 2);
    assert_eq!(
        image.rgba,
        vec![
            0x0A, 0x14, 0x1E, 0xFF, 0x28, 0x32, 0x3C, 0xFF, 0x46, 0x50, 0x5A, 0xFF, 0x64, 0x6E,
            0x78, 0xFF
        ]
    );
}
