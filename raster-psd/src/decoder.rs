use log::{debug, trace};
use raster_core::bytestream::ZByteReader;
use raster_core::colorspace::ColorSpace;
use raster_core::image::DecodedImage;
use raster_core::options::DecoderOptions;

use crate::constants::{COLOR_MODE_RGB, PSD_SIGNATURE, SUPPORTED_CHANNELS};
use crate::errors::PsdErrors;

#[derive(Default, Debug, Copy, Clone)]
struct PsdInfo
{
    width:    usize,
    height:   usize,
    channels: u16,
    depth:    u16
}

/// A decoder for uncompressed, 8-bit-per-channel RGB Photoshop documents.
pub struct PsdDecoder<'a>
{
    stream:  ZByteReader<'a>,
    options: DecoderOptions,
    info:    PsdInfo
}

impl<'a> PsdDecoder<'a>
{
    #[must_use]
    pub fn new(data: &'a [u8]) -> PsdDecoder<'a>
    {
        Self::new_with_options(data, DecoderOptions::default())
    }

    #[must_use]
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PsdDecoder<'a>
    {
        PsdDecoder {
            stream: ZByteReader::new(data),
            options,
            info: PsdInfo::default()
        }
    }

    pub fn get_dimensions(&self) -> (usize, usize)
    {
        (self.info.width, self.info.height)
    }

    /// This decoder only accepts RGB-mode documents, so the source
    /// colorspace is fixed rather than read from the header.
    pub const fn source_colorspace(&self) -> ColorSpace
    {
        ColorSpace::RGB
    }

    pub fn decode(&mut self) -> Result<DecodedImage, PsdErrors>
    {
        self.parse_header()?;

        // color mode data, image resources, layer/mask info: all skipped by
        // their own 4-byte big-endian length prefix.
        self.skip_length_prefixed_section()?;
        self.skip_length_prefixed_section()?;
        self.skip_length_prefixed_section()?;

        let compression = self.stream.get_u16_be()?;
        if compression != 0
        {
            return Err(PsdErrors::UnknownCompression(compression));
        }

        if self.info.depth != 8
        {
            return Err(PsdErrors::UnsupportedDepthForRawRead(self.info.depth));
        }

        debug!("decoding {}x{} raw RGB PSD", self.info.width, self.info.height);

        self.read_planar_rgb()
    }

    fn parse_header(&mut self) -> Result<(), PsdErrors>
    {
        let magic = self.stream.get_u32_be()?;
        if magic != PSD_SIGNATURE
        {
            return Err(PsdErrors::WrongMagicBytes(magic));
        }

        let version = self.stream.get_u16_be()?;
        if version != 1
        {
            return Err(PsdErrors::UnsupportedFileVersion(version));
        }

        self.stream.skip(6); // reserved, must be zero; not validated

        let channels = self.stream.get_u16_be()?;
        if channels != SUPPORTED_CHANNELS
        {
            return Err(PsdErrors::UnsupportedChannelCount(channels));
        }

        let height = self.stream.get_u32_be()? as usize;
        let width = self.stream.get_u32_be()? as usize;

        if width == 0 || height == 0
        {
            return Err(PsdErrors::Generic("width or height cannot be zero"));
        }

        if width > self.options.get_max_width()
        {
            return Err(PsdErrors::LargeDimensions(width, self.options.get_max_width()));
        }

        if height > self.options.get_max_height()
        {
            return Err(PsdErrors::LargeDimensions(height, self.options.get_max_height()));
        }

        let depth = self.stream.get_u16_be()?;
        if !matches!(depth, 1 | 8 | 16 | 32)
        {
            return Err(PsdErrors::UnsupportedBitDepth(depth));
        }

        let color_mode = self.stream.get_u16_be()?;
        if color_mode != COLOR_MODE_RGB
        {
            return Err(PsdErrors::UnsupportedColorMode(color_mode));
        }

        trace!("PSD header: {width}x{height}, {channels} channels, {depth}-bit, RGB");

        self.info = PsdInfo { width, height, channels, depth };

        Ok(())
    }

    fn skip_length_prefixed_section(&mut self) -> Result<(), PsdErrors>
    {
        let length = self.stream.get_u32_be()? as usize;
        self.stream.skip(length);
        Ok(())
    }

    fn read_planar_rgb(&mut self) -> Result<DecodedImage, PsdErrors>
    {
        let plane_size = self.info.width * self.info.height;
        let mut rgba = vec![0u8; plane_size * 4];

        for channel in 0..3usize
        {
            let plane = self.stream.get(plane_size)?;

            for (i, &sample) in plane.iter().enumerate()
            {
                rgba[i * 4 + channel] = sample;
            }
        }

        for pixel in rgba.chunks_exact_mut(4)
        {
            pixel[3] = 255;
        }

        Ok(DecodedImage::new(rgba, self.info.width, self.info.height))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn build_psd(width: u32, height: u32, depth: u16, pixels: &[u8]) -> Vec<u8>
    {
        let mut data = Vec::new();
        data.extend_from_slice(&PSD_SIGNATURE.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes()); // version
        data.extend_from_slice(&[0u8; 6]); // reserved
        data.extend_from_slice(&3u16.to_be_bytes()); // channels
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&depth.to_be_bytes());
        data.extend_from_slice(&COLOR_MODE_RGB.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes()); // color mode data
        data.extend_from_slice(&0u32.to_be_bytes()); // image resources
        data.extend_from_slice(&0u32.to_be_bytes()); // layer/mask info
        data.extend_from_slice(&0u16.to_be_bytes()); // compression: raw
        data.extend_from_slice(pixels);
        data
    }

    #[test]
    fn single_pixel_round_trips_to_rgba()
    {
        let data = build_psd(1, 1, 8, &[10, 20, 30]);
        let mut decoder = PsdDecoder::new(&data);

        let image = decoder.decode().unwrap();
        assert_eq!(image.rgba, vec![10, 20, 30, 255]);
    }

    #[test]
    fn rejects_bad_magic()
    {
        let mut data = build_psd(1, 1, 8, &[0, 0, 0]);
        data[0] = 0x00;

        let mut decoder = PsdDecoder::new(&data);
        assert!(decoder.decode().is_err());
    }

    #[test]
    fn sixteen_bit_depth_is_recognized_but_unsupported_for_raw_read()
    {
        let data = build_psd(1, 1, 16, &[0, 10, 0, 20, 0, 30]);
        let mut decoder = PsdDecoder::new(&data);

        assert!(matches!(decoder.decode(), Err(PsdErrors::UnsupportedDepthForRawRead(16))));
    }
}
