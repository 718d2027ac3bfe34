use log::debug;
use raster_core::bytestream::ZByteReader;
use raster_core::colorspace::ColorSpace;
use raster_core::image::DecodedImage;
use raster_core::options::DecoderOptions;
use raster_core::sample::rescale;

use crate::constants::{ADAM7_PASSES, PNG_SIGNATURE};
use crate::enums::{FilterMethod, InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngErrors;
use crate::filters::{defilter_average, defilter_none, defilter_paeth, defilter_sub, defilter_up};

#[derive(Copy, Clone)]
pub(crate) struct PngChunk
{
    pub length: usize,
    pub chunk:  [u8; 4]
}

#[derive(Default, Debug, Copy, Clone)]
pub(crate) struct PngInfo
{
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub filter_method:    FilterMethod,
    pub interlace_method: InterlaceMethod
}

pub struct PngDecoder<'a>
{
    pub(crate) seen_hdr:      bool,
    pub(crate) seen_plte:     bool,
    pub(crate) seen_trns:     bool,
    pub(crate) seen_idat:     bool,
    pub(crate) idat_finished: bool,
    pub(crate) stream:        ZByteReader<'a>,
    pub(crate) options:       DecoderOptions,
    pub(crate) info:          PngInfo,
    pub(crate) palette:       Vec<[u8; 3]>,
    pub(crate) trns_gray:     u16,
    pub(crate) trns_rgb:      [u16; 3],
    pub(crate) trns_alpha:    Vec<u8>,
    pub(crate) idat_chunks:   Vec<u8>
}

impl<'a> PngDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> PngDecoder<'a>
    {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a>
    {
        PngDecoder {
            seen_hdr: false,
            seen_plte: false,
            seen_trns: false,
            seen_idat: false,
            idat_finished: false,
            stream: ZByteReader::new(data),
            options,
            info: PngInfo::default(),
            palette: Vec::new(),
            trns_gray: 0,
            trns_rgb: [0; 3],
            trns_alpha: Vec::new(),
            idat_chunks: Vec::new()
        }
    }

    pub const fn get_dimensions(&self) -> Option<(usize, usize)>
    {
        if !self.seen_hdr
        {
            return None;
        }
        Some((self.info.width, self.info.height))
    }

    /// The color type IHDR declared, before palette lookup or tRNS expand
    /// to RGBA8. `None` until IHDR has been parsed.
    pub const fn source_colorspace(&self) -> Option<ColorSpace>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some(match self.info.color
        {
            PngColor::Luma => ColorSpace::Luma,
            PngColor::LumaA => ColorSpace::LumaA,
            PngColor::RGB | PngColor::Palette => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA,
            PngColor::Unknown => ColorSpace::Unknown
        })
    }

    fn read_chunk_header(&mut self) -> Result<PngChunk, PngErrors>
    {
        let length = self.stream.get_u32_be()? as usize;
        let chunk_type_int = self.stream.get_u32_be()?.to_be_bytes();

        if !self.stream.has(length + 4)
        {
            return Err(PngErrors::Generic(format!(
                "truncated chunk {:?}: need {} bytes, {} remain",
                chunk_type_int,
                length + 4,
                self.stream.remaining()
            )));
        }

        Ok(PngChunk { length, chunk: chunk_type_int })
    }

    fn chunk_type(chunk: &[u8; 4]) -> PngChunkType
    {
        match chunk
        {
            b"IHDR" => PngChunkType::IHDR,
            b"PLTE" => PngChunkType::PLTE,
            b"IDAT" => PngChunkType::IDAT,
            b"tRNS" => PngChunkType::TRNS,
            b"IEND" => PngChunkType::IEND,
            _ => PngChunkType::Unknown
        }
    }

    /// Decode the image into row-major RGBA8.
    pub fn decode(&mut self) -> Result<DecodedImage, PngErrors>
    {
        let signature = self.stream.get_u64_be()?;

        if signature != PNG_SIGNATURE
        {
            return Err(PngErrors::BadSignature);
        }

        if self.stream.peek_at(4, 4)? != b"IHDR"
        {
            return Err(PngErrors::GenericStatic("first chunk not IHDR, corrupt PNG"));
        }

        loop
        {
            let header = self.read_chunk_header()?;
            let chunk_type = Self::chunk_type(&header.chunk);

            if chunk_type == PngChunkType::IDAT
            {
                if self.idat_finished
                {
                    return Err(PngErrors::GenericStatic("IDAT chunks are not contiguous"));
                }
                self.seen_idat = true;
            }
            else if self.seen_idat
            {
                self.idat_finished = true;
            }

            match chunk_type
            {
                PngChunkType::IHDR => self.parse_ihdr(header)?,
                PngChunkType::PLTE => self.parse_plte(header)?,
                PngChunkType::IDAT => self.parse_idat(header)?,
                PngChunkType::TRNS => self.parse_trns(header)?,
                PngChunkType::IEND => break,
                PngChunkType::Unknown => self.skip_unknown_chunk(header)?
            }
        }

        if self.info.color == PngColor::Palette && self.palette.is_empty()
        {
            return Err(PngErrors::EmptyPalette);
        }

        let raw_size = self.expected_raw_size();

        debug!("inflating {} IDAT bytes into {raw_size} raw bytes", self.idat_chunks.len());

        let raw = raster_inflate::decode_zlib(&self.idat_chunks, raw_size)?;
        self.idat_chunks = Vec::new();

        let width = self.info.width;
        let height = self.info.height;
        let mut rgba = vec![0u8; width * height * 4];

        if self.info.interlace_method == InterlaceMethod::Standard
        {
            let defiltered = self.defilter_image(&raw, width, height)?;
            self.expand_to_rgba(&defiltered, width, height, &mut rgba, 0, 0, 1, 1)?;
        }
        else
        {
            let mut offset = 0;

            for &(h_start, v_start, h_delta, v_delta) in &ADAM7_PASSES
            {
                let pass_w = ceil_div(width.saturating_sub(h_start), h_delta);
                let pass_h = ceil_div(height.saturating_sub(v_start), v_delta);

                if pass_w == 0 || pass_h == 0
                {
                    continue;
                }

                let body_len = scanline_body_len(pass_w, self.samples(), self.info.depth);
                let pass_len = (body_len + 1) * pass_h;

                let pass_raw = raw
                    .get(offset..offset + pass_len)
                    .ok_or(PngErrors::GenericStatic("raw buffer shorter than Adam7 pass needs"))?;

                let defiltered = self.defilter_image(pass_raw, pass_w, pass_h)?;
                self.expand_to_rgba(&defiltered, pass_w, pass_h, &mut rgba, h_start, v_start, h_delta, v_delta)?;

                offset += pass_len;
            }
        }

        Ok(DecodedImage::new(rgba, width, height))
    }

    const fn samples(&self) -> u8
    {
        self.info.color.samples_per_pixel()
    }

    fn expected_raw_size(&self) -> usize
    {
        let samples = self.samples();

        if self.info.interlace_method == InterlaceMethod::Standard
        {
            (scanline_body_len(self.info.width, samples, self.info.depth) + 1) * self.info.height
        }
        else
        {
            ADAM7_PASSES
                .iter()
                .map(|&(h_start, v_start, h_delta, v_delta)| {
                    let pass_w = ceil_div(self.info.width.saturating_sub(h_start), h_delta);
                    let pass_h = ceil_div(self.info.height.saturating_sub(v_start), v_delta);

                    if pass_w == 0 || pass_h == 0
                    {
                        0
                    }
                    else
                    {
                        (scanline_body_len(pass_w, samples, self.info.depth) + 1) * pass_h
                    }
                })
                .sum()
        }
    }

    /// Reverse the per-scanline filters, returning a buffer of just the raw
    /// sample bytes (filter-type bytes stripped).
    fn defilter_image(&self, raw: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngErrors>
    {
        let samples = self.samples();
        let body_len = scanline_body_len(width, samples, self.info.depth);
        let bpp = bytes_per_pixel(samples, self.info.depth);
        let scanline_len = body_len + 1;

        if raw.len() < scanline_len * height
        {
            return Err(PngErrors::TooSmallOutput(scanline_len * height, raw.len()));
        }

        let mut out = vec![0u8; body_len * height];
        let mut prev_start: Option<usize> = None;

        for row in 0..height
        {
            let in_row = &raw[row * scanline_len..row * scanline_len + scanline_len];
            let filter_byte = in_row[0];
            let body = &in_row[1..];

            let filter = FilterMethod::from_int(filter_byte)
                .ok_or_else(|| PngErrors::Generic(format!("unknown filter type {filter_byte}")))?;

            let out_start = row * body_len;
            let (done, rest) = out.split_at_mut(out_start);
            let current = &mut rest[..body_len];
            let prev: &[u8] = match prev_start
            {
                Some(start) => &done[start..start + body_len],
                None => &[]
            };

            match filter
            {
                FilterMethod::None => defilter_none(body, current),
                FilterMethod::Sub => defilter_sub(body, current, bpp),
                FilterMethod::Up => defilter_up(body, prev, current),
                FilterMethod::Average => defilter_average(body, prev, current, bpp),
                FilterMethod::Paeth => defilter_paeth(body, prev, current, bpp)
            }

            prev_start = Some(out_start);
        }

        Ok(out)
    }

    /// Expand a (possibly sub-image, for Adam7) defiltered buffer into the
    /// final RGBA8 output, placing each pixel at `(h_start + col*h_delta,
    /// v_start + row*v_delta)`.
    #[allow(clippy::too_many_arguments)]
    fn expand_to_rgba(
        &self, defiltered: &[u8], width: usize, height: usize, rgba: &mut [u8], h_start: usize,
        v_start: usize, h_delta: usize, v_delta: usize
    ) -> Result<(), PngErrors>
    {
        let samples = usize::from(self.samples());
        let depth = self.info.depth;
        let body_len = scanline_body_len(width, samples as u8, depth);

        for row in 0..height
        {
            let row_bytes = &defiltered[row * body_len..row * body_len + body_len];
            let mut reader = ZByteReader::new(row_bytes);

            for col in 0..width
            {
                let mut raw_samples = [0u16; 4];

                for s in raw_samples.iter_mut().take(samples)
                {
                    *s = read_sample(&mut reader, depth);
                }

                let out_x = h_start + col * h_delta;
                let out_y = v_start + row * v_delta;
                let out_width = self.info.width;
                let pixel_start = (out_y * out_width + out_x) * 4;

                let pixel = self.samples_to_rgba(&raw_samples[..samples])?;
                rgba[pixel_start..pixel_start + 4].copy_from_slice(&pixel);
            }
        }

        Ok(())
    }

    fn samples_to_rgba(&self, raw: &[u16]) -> Result<[u8; 4], PngErrors>
    {
        let depth = self.info.depth;

        // tRNS gray/RGB values are always transmitted as 16-bit big-endian;
        // compare against the sample's raw (pre-rescale) bit pattern using
        // only the low `depth` bits, since that's the range the sample
        // itself can occupy.
        let depth_mask = if depth >= 16 { u16::MAX } else { (1u16 << depth) - 1 };

        let pixel = match self.info.color
        {
            PngColor::Luma =>
            {
                let gray = rescale(depth, raw[0]);
                let alpha = if self.seen_trns && raw[0] == (self.trns_gray & depth_mask) { 0 } else { 255 };
                [gray, gray, gray, alpha]
            }
            PngColor::RGB =>
            {
                let r = rescale(depth, raw[0]);
                let g = rescale(depth, raw[1]);
                let b = rescale(depth, raw[2]);

                let alpha = if self.seen_trns
                    && raw[0] == (self.trns_rgb[0] & depth_mask)
                    && raw[1] == (self.trns_rgb[1] & depth_mask)
                    && raw[2] == (self.trns_rgb[2] & depth_mask)
                {
                    0
                }
                else
                {
                    255
                };

                [r, g, b, alpha]
            }
            PngColor::Palette =>
            {
                let index = raw[0] as usize;
                let entry = self
                    .palette
                    .get(index)
                    .copied()
                    .ok_or(PngErrors::PaletteIndexOutOfRange(index, self.palette.len()))?;
                let alpha = self.trns_alpha.get(index).copied().unwrap_or(255);

                [entry[0], entry[1], entry[2], alpha]
            }
            PngColor::LumaA =>
            {
                let gray = rescale(depth, raw[0]);
                let alpha = rescale(depth, raw[1]);
                [gray, gray, gray, alpha]
            }
            PngColor::RGBA =>
            {
                let r = rescale(depth, raw[0]);
                let g = rescale(depth, raw[1]);
                let b = rescale(depth, raw[2]);
                let a = rescale(depth, raw[3]);
                [r, g, b, a]
            }
            PngColor::Unknown => [0, 0, 0, 255]
        };

        Ok(pixel)
    }
}

fn read_sample(reader: &mut ZByteReader, depth: u8) -> u16
{
    match depth
    {
        16 => reader.get_u16_be().unwrap_or(0),
        8 => u16::from(reader.get_u8()),
        _ => reader.take_bits_msb(depth).unwrap_or(0) as u16
    }
}

const fn scanline_body_len(width: usize, samples: u8, depth: u8) -> usize
{
    (width * samples as usize * depth as usize + 7) / 8
}

const fn bytes_per_pixel(samples: u8, depth: u8) -> usize
{
    ((samples as usize) * (depth as usize) + 7) / 8
}

const fn ceil_div(a: usize, b: usize) -> usize
{
    (a + b - 1) / b
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn scanline_body_len_matches_spec_formula()
    {
        // depth 8, 3 samples, width 4 -> 12 bytes
        assert_eq!(scanline_body_len(4, 3, 8), 12);
        // depth 1, 1 sample, width 9 -> ceil(9/8) = 2 bytes
        assert_eq!(scanline_body_len(9, 1, 1), 2);
    }

    #[test]
    fn rejects_bad_signature()
    {
        let data = [0u8; 16];
        let mut decoder = PngDecoder::new(&data);
        assert!(decoder.decode().is_err());
    }
}
