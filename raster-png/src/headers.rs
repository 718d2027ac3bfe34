use log::{info, trace, warn};

use crate::decoder::{PngChunk, PngDecoder};
use crate::enums::{FilterMethod, InterlaceMethod, PngColor};
use crate::error::PngErrors;

impl<'a> PngDecoder<'a>
{
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk) -> Result<(), PngErrors>
    {
        if self.seen_hdr
        {
            return Err(PngErrors::GenericStatic("multiple IHDR chunks, corrupt PNG"));
        }

        if chunk.length != 13
        {
            return Err(PngErrors::GenericStatic("bad IHDR length"));
        }

        self.info.width = self.stream.get_u32_be()? as usize;
        self.info.height = self.stream.get_u32_be()? as usize;

        if self.info.width == 0 || self.info.height == 0
        {
            return Err(PngErrors::GenericStatic("width or height cannot be zero"));
        }

        if self.info.width > self.options.get_max_width()
        {
            return Err(PngErrors::Generic(format!(
                "image width {} exceeds configured maximum {}",
                self.info.width,
                self.options.get_max_width()
            )));
        }

        if self.info.height > self.options.get_max_height()
        {
            return Err(PngErrors::Generic(format!(
                "image height {} exceeds configured maximum {}",
                self.info.height,
                self.options.get_max_height()
            )));
        }

        self.info.depth = self.stream.get_u8_err()?;
        let color = self.stream.get_u8_err()?;

        self.info.color = PngColor::from_int(color)
            .ok_or_else(|| PngErrors::Generic(format!("unknown PNG color type {color}")))?;

        match (self.info.depth, self.info.color)
        {
            (1 | 2 | 4 | 8, PngColor::Palette) => {}
            (16, PngColor::Palette) =>
            {
                return Err(PngErrors::GenericStatic("indexed color cannot have 16 bit depth"));
            }
            (1 | 2 | 4 | 8 | 16, PngColor::Luma) => {}
            (8 | 16, PngColor::RGB | PngColor::LumaA | PngColor::RGBA) => {}
            (depth, color) =>
            {
                return Err(PngErrors::Generic(format!(
                    "color type {color:?} cannot have bit depth {depth}"
                )))
            }
        }

        if self.stream.get_u8_err()? != 0
        {
            return Err(PngErrors::GenericStatic("unsupported compression method"));
        }

        let filter_method = self.stream.get_u8_err()?;
        if filter_method != 0
        {
            return Err(PngErrors::Generic(format!(
                "unknown filter method {filter_method}"
            )));
        }
        self.info.filter_method = FilterMethod::None;

        let interlace_method = self.stream.get_u8_err()?;
        self.info.interlace_method = InterlaceMethod::from_int(interlace_method)
            .ok_or_else(|| PngErrors::Generic(format!("unknown interlace method {interlace_method}")))?;

        // skip CRC
        self.stream.skip(4);

        info!("width: {}", self.info.width);
        info!("height: {}", self.info.height);
        info!("depth: {}", self.info.depth);
        info!("color: {:?}", self.info.color);
        info!("interlace: {:?}", self.info.interlace_method);

        self.seen_hdr = true;

        Ok(())
    }

    pub(crate) fn parse_plte(&mut self, chunk: PngChunk) -> Result<(), PngErrors>
    {
        if chunk.length % 3 != 0
        {
            return Err(PngErrors::GenericStatic("invalid PLTE length, corrupt PNG"));
        }

        let entries = chunk.length / 3;
        self.palette.clear();
        self.palette.reserve(entries);

        for _ in 0..entries
        {
            let r = self.stream.get_u8();
            let g = self.stream.get_u8();
            let b = self.stream.get_u8();
            self.palette.push([r, g, b]);
        }

        self.stream.skip(4);
        self.seen_plte = true;

        Ok(())
    }

    pub(crate) fn parse_idat(&mut self, chunk: PngChunk) -> Result<(), PngErrors>
    {
        let idat_stream = self.stream.get(chunk.length)?;
        self.idat_chunks.extend_from_slice(idat_stream);

        self.stream.skip(4);

        Ok(())
    }

    pub(crate) fn parse_trns(&mut self, chunk: PngChunk) -> Result<(), PngErrors>
    {
        match self.info.color
        {
            PngColor::Luma =>
            {
                self.trns_gray = self.stream.get_u16_be()?;
            }
            PngColor::RGB =>
            {
                self.trns_rgb[0] = self.stream.get_u16_be()?;
                self.trns_rgb[1] = self.stream.get_u16_be()?;
                self.trns_rgb[2] = self.stream.get_u16_be()?;
            }
            PngColor::Palette =>
            {
                if self.palette.is_empty()
                {
                    return Err(PngErrors::GenericStatic("tRNS chunk before PLTE"));
                }
                if chunk.length > self.palette.len()
                {
                    return Err(PngErrors::Generic(format!(
                        "tRNS chunk with {} entries, more than palette's {}",
                        chunk.length,
                        self.palette.len()
                    )));
                }

                self.trns_alpha.resize(self.palette.len(), 255);
                for slot in self.trns_alpha.iter_mut().take(chunk.length)
                {
                    *slot = self.stream.get_u8();
                }
            }
            other =>
            {
                return Err(PngErrors::Generic(format!(
                    "a tRNS chunk shall not appear for color type {other:?}"
                )));
            }
        }

        self.stream.skip(4);
        self.seen_trns = true;

        Ok(())
    }

    /// Any chunk we don't specifically understand is simply skipped past,
    /// per the ancillary-chunk handling this decoder supports.
    pub(crate) fn skip_unknown_chunk(&mut self, chunk: PngChunk) -> Result<(), PngErrors>
    {
        trace!("skipping chunk {:?}, length {}", chunk.chunk, chunk.length);
        if !self.stream.has(chunk.length + 4)
        {
            warn!("truncated ancillary chunk, bailing out of chunk walk");
            return Err(PngErrors::GenericStatic("truncated chunk"));
        }
        self.stream.skip(chunk.length + 4);
        Ok(())
    }
}
