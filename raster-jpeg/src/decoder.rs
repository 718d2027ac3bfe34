use log::{debug, trace};
use raster_core::bytestream::ZByteReader;
use raster_core::colorspace::ColorSpace;
use raster_core::huffman::HuffmanTable;
use raster_core::image::DecodedImage;
use raster_core::options::DecoderOptions;

use crate::color_convert;
use crate::constants::{
    is_sof_marker, UN_ZIGZAG, MARKER_DHT, MARKER_DQT, MARKER_DRI, MARKER_EOI, MARKER_RST0,
    MARKER_RST7, MARKER_SOF0, MARKER_SOI, MARKER_SOS
};
use crate::errors::JpegErrors;
use crate::idct::idct_block;

#[derive(Clone)]
pub(crate) struct Component
{
    id:           u8,
    h:            u8,
    v:            u8,
    tq:           u8,
    td:           u8,
    ta:           u8,
    dc_pred:      i32,
    plane:        Vec<u8>,
    plane_width:  usize,
    plane_height: usize
}

/// A baseline (SOF0) JPEG decoder.
///
/// Produces RGBA8 only; progressive, lossless and arithmetic-coded frames
/// are rejected outright rather than partially decoded.
pub struct JpegDecoder<'a>
{
    stream:            ZByteReader<'a>,
    options:           DecoderOptions,
    width:             usize,
    height:            usize,
    hmax:              u8,
    vmax:              u8,
    mcu_cols:          usize,
    mcu_rows:          usize,
    components:        Vec<Component>,
    quant_tables:      [Option<[u16; 64]>; 4],
    dc_tables:         [Option<HuffmanTable>; 4],
    ac_tables:         [Option<HuffmanTable>; 4],
    restart_interval:  u16
}

impl<'a> JpegDecoder<'a>
{
    #[must_use]
    pub fn new(data: &'a [u8]) -> JpegDecoder<'a>
    {
        Self::new_with_options(data, DecoderOptions::default())
    }

    #[must_use]
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> JpegDecoder<'a>
    {
        JpegDecoder {
            stream: ZByteReader::new(data),
            options,
            width: 0,
            height: 0,
            hmax: 1,
            vmax: 1,
            mcu_cols: 0,
            mcu_rows: 0,
            components: Vec::new(),
            quant_tables: [None, None, None, None],
            dc_tables: [None, None, None, None],
            ac_tables: [None, None, None, None],
            restart_interval: 0
        }
    }

    pub fn decode(&mut self) -> Result<DecodedImage, JpegErrors>
    {
        if next_marker(&mut self.stream)? != MARKER_SOI
        {
            return Err(JpegErrors::GenericStatic("JPEG stream does not start with SOI"));
        }
        debug!("SOI");

        loop
        {
            let marker = next_marker(&mut self.stream)?;

            if is_sof_marker(marker)
            {
                if marker != MARKER_SOF0
                {
                    return Err(JpegErrors::UnsupportedSof(marker));
                }
                break;
            }

            self.handle_table_segment(marker)?;
        }

        self.parse_sof0()?;
        debug!("SOF0: {}x{}, {} component(s)", self.width, self.height, self.components.len());

        loop
        {
            let marker = next_marker(&mut self.stream)?;

            if marker == MARKER_SOS
            {
                break;
            }

            self.handle_table_segment(marker)?;
        }

        self.parse_sos()?;
        debug!("SOS: entering entropy-coded data");

        self.decode_entropy_data()?;

        Ok(self.finish())
    }

    pub fn get_dimensions(&self) -> (usize, usize)
    {
        (self.width, self.height)
    }

    /// The frame's source colorspace (before YCbCr->RGB conversion).
    /// `None` until SOF0 has been parsed.
    pub fn source_colorspace(&self) -> Option<ColorSpace>
    {
        match self.components.len()
        {
            0 => None,
            1 => Some(ColorSpace::Luma),
            _ => Some(ColorSpace::YCbCr)
        }
    }

    fn handle_table_segment(&mut self, marker: u8) -> Result<(), JpegErrors>
    {
        match marker
        {
            MARKER_DQT => self.parse_dqt(),
            MARKER_DHT => self.parse_dht(),
            MARKER_DRI => self.parse_dri(),
            _ => self.skip_segment()
        }
    }

    fn skip_segment(&mut self) -> Result<(), JpegErrors>
    {
        let length = self.stream.get_u16_be()? as usize;
        if length < 2
        {
            return Err(JpegErrors::GenericStatic("segment length shorter than its own length field"));
        }
        self.stream.skip(length - 2);
        Ok(())
    }

    fn parse_dqt(&mut self) -> Result<(), JpegErrors>
    {
        let mut remaining = i32::from(self.stream.get_u16_be()?) - 2;

        while remaining > 0
        {
            let pq_tq = self.stream.get_u8_err()?;
            let precision = pq_tq >> 4;
            let id = usize::from(pq_tq & 0x0F);

            if id > 3
            {
                return Err(JpegErrors::GenericStatic("quantization table id out of range"));
            }

            if !(0..=1).contains(&precision)
            {
                return Err(JpegErrors::GenericStatic("quantization table precision must be 0 or 1"));
            }

            let mut table = [0u16; 64];

            if precision == 0
            {
                for entry in table.iter_mut()
                {
                    *entry = u16::from(self.stream.get_u8_err()?);
                }
                remaining -= 1 + 64;
            }
            else
            {
                for entry in table.iter_mut()
                {
                    *entry = self.stream.get_u16_be()?;
                }
                remaining -= 1 + 128;
            }

            trace!("DQT installed at slot {id}");
            self.quant_tables[id] = Some(table);
        }

        Ok(())
    }

    fn parse_dht(&mut self) -> Result<(), JpegErrors>
    {
        let mut remaining = i32::from(self.stream.get_u16_be()?) - 2;

        while remaining > 0
        {
            let tc_th = self.stream.get_u8_err()?;
            let class = tc_th >> 4;
            let id = usize::from(tc_th & 0x0F);

            if id > 3
            {
                return Err(JpegErrors::GenericStatic("Huffman table id out of range"));
            }

            let mut counts = [0u8; 16];
            let mut total_symbols = 0usize;

            for count in counts.iter_mut()
            {
                *count = self.stream.get_u8_err()?;
                total_symbols += usize::from(*count);
            }

            let mut lengths = vec![0u8; 256];

            for (len, &count) in counts.iter().enumerate()
            {
                for _ in 0..count
                {
                    let symbol = self.stream.get_u8_err()?;
                    lengths[usize::from(symbol)] = (len + 1) as u8;
                }
            }

            let table = HuffmanTable::build(&lengths, 16)
                .map_err(|_| JpegErrors::GenericStatic("Huffman code lengths in DHT don't form a valid canonical code"))?;

            if class == 0
            {
                trace!("DHT installed DC table at slot {id}");
                self.dc_tables[id] = Some(table);
            }
            else
            {
                trace!("DHT installed AC table at slot {id}");
                self.ac_tables[id] = Some(table);
            }

            remaining -= 1 + 16 + total_symbols as i32;
        }

        Ok(())
    }

    fn parse_dri(&mut self) -> Result<(), JpegErrors>
    {
        let length = self.stream.get_u16_be()?;
        if length != 4
        {
            return Err(JpegErrors::GenericStatic("DRI segment has the wrong length"));
        }
        self.restart_interval = self.stream.get_u16_be()?;
        debug!("DRI: restart interval {}", self.restart_interval);
        Ok(())
    }

    fn parse_sof0(&mut self) -> Result<(), JpegErrors>
    {
        let _length = self.stream.get_u16_be()?;
        let precision = self.stream.get_u8_err()?;

        if precision != 8
        {
            return Err(JpegErrors::UnsupportedPrecision(precision));
        }

        let height = self.stream.get_u16_be()? as usize;
        let width = self.stream.get_u16_be()? as usize;

        if width == 0
        {
            return Err(JpegErrors::GenericStatic("frame width cannot be zero"));
        }

        if width > self.options.get_max_width() || height > self.options.get_max_height()
        {
            return Err(JpegErrors::Generic(format!(
                "frame {width}x{height} exceeds the configured maximum"
            )));
        }

        let num_components = self.stream.get_u8_err()?;

        if num_components != 1 && num_components != 3
        {
            return Err(JpegErrors::TooManyComponents(num_components));
        }

        let mut components = Vec::with_capacity(usize::from(num_components));
        let mut hmax = 1u8;
        let mut vmax = 1u8;

        for _ in 0..num_components
        {
            let id = self.stream.get_u8_err()?;
            let hv = self.stream.get_u8_err()?;
            let tq = self.stream.get_u8_err()?;

            let h = hv >> 4;
            let v = hv & 0x0F;

            if h == 0 || v == 0 || tq > 3
            {
                return Err(JpegErrors::GenericStatic("invalid component sampling factors or quantization table id"));
            }

            hmax = hmax.max(h);
            vmax = vmax.max(v);

            components.push(Component {
                id,
                h,
                v,
                tq,
                td: 0,
                ta: 0,
                dc_pred: 0,
                plane: Vec::new(),
                plane_width: 0,
                plane_height: 0
            });
        }

        for component in &components
        {
            if hmax % component.h != 0 || vmax % component.v != 0
            {
                return Err(JpegErrors::GenericStatic(
                    "component sampling factor does not divide the frame's maximum"
                ));
            }
        }

        let mcu_cols = ceil_div(width, 8 * usize::from(hmax));
        let mcu_rows = ceil_div(height, 8 * usize::from(vmax));

        for component in &mut components
        {
            component.plane_width = usize::from(component.h) * mcu_cols * 8;
            component.plane_height = usize::from(component.v) * mcu_rows * 8;
            component.plane = vec![0u8; component.plane_width * component.plane_height];
        }

        self.width = width;
        self.height = height;
        self.hmax = hmax;
        self.vmax = vmax;
        self.mcu_cols = mcu_cols;
        self.mcu_rows = mcu_rows;
        self.components = components;

        Ok(())
    }

    fn parse_sos(&mut self) -> Result<(), JpegErrors>
    {
        let _length = self.stream.get_u16_be()?;
        let num_scan_components = self.stream.get_u8_err()?;

        if usize::from(num_scan_components) != self.components.len()
        {
            return Err(JpegErrors::GenericStatic("scan selects a different component count than the frame declared"));
        }

        for _ in 0..num_scan_components
        {
            let selector = self.stream.get_u8_err()?;
            let td_ta = self.stream.get_u8_err()?;

            let component = self
                .components
                .iter_mut()
                .find(|c| c.id == selector)
                .ok_or(JpegErrors::GenericStatic("scan selects a component id the frame never declared"))?;

            component.td = td_ta >> 4;
            component.ta = td_ta & 0x0F;
        }

        let spectral_start = self.stream.get_u8_err()?;
        let spectral_end = self.stream.get_u8_err()?;
        let approximation = self.stream.get_u8_err()?;

        if spectral_start != 0 || spectral_end != 63 || approximation != 0
        {
            return Err(JpegErrors::GenericStatic("non-baseline scan parameters"));
        }

        Ok(())
    }

    fn decode_entropy_data(&mut self) -> Result<(), JpegErrors>
    {
        let segments = split_entropy_segments(&mut self.stream)?;

        let total_mcus = self.mcu_cols * self.mcu_rows;
        let restart_interval = if self.restart_interval == 0
        {
            total_mcus.max(1)
        }
        else
        {
            usize::from(self.restart_interval)
        };

        let mut mcu_index = 0usize;

        for segment in &segments
        {
            if mcu_index >= total_mcus
            {
                break;
            }

            let mut reader = ZByteReader::new(segment);

            for component in &mut self.components
            {
                component.dc_pred = 0;
            }

            let mcus_here = restart_interval.min(total_mcus - mcu_index);

            for _ in 0..mcus_here
            {
                let mcu_row = mcu_index / self.mcu_cols;
                let mcu_col = mcu_index % self.mcu_cols;

                self.decode_mcu(&mut reader, mcu_row, mcu_col)?;
                mcu_index += 1;
            }
        }

        if mcu_index != total_mcus
        {
            return Err(JpegErrors::GenericStatic("entropy-coded data ended before every MCU was decoded"));
        }

        Ok(())
    }

    fn decode_mcu(&mut self, reader: &mut ZByteReader, mcu_row: usize, mcu_col: usize) -> Result<(), JpegErrors>
    {
        for comp_idx in 0..self.components.len()
        {
            let (h, v, tq, td, ta) =
            {
                let c = &self.components[comp_idx];
                (c.h, c.v, c.tq, c.td, c.ta)
            };

            let quant = self.quant_tables[usize::from(tq)]
                .as_ref()
                .ok_or(JpegErrors::GenericStatic("block references a quantization table that was never installed"))?;
            let dc_table = self.dc_tables[usize::from(td)]
                .as_ref()
                .ok_or(JpegErrors::GenericStatic("block references a DC Huffman table that was never installed"))?;
            let ac_table = self.ac_tables[usize::from(ta)]
                .as_ref()
                .ok_or(JpegErrors::GenericStatic("block references an AC Huffman table that was never installed"))?;

            for by in 0..usize::from(v)
            {
                for bx in 0..usize::from(h)
                {
                    let mut dc_pred = self.components[comp_idx].dc_pred;
                    let block = decode_block(dc_table, ac_table, quant, &mut dc_pred, reader)?;
                    self.components[comp_idx].dc_pred = dc_pred;

                    let plane_x0 = mcu_col * usize::from(h) * 8 + bx * 8;
                    let plane_y0 = mcu_row * usize::from(v) * 8 + by * 8;

                    let component = &mut self.components[comp_idx];
                    for y in 0..8
                    {
                        let row_off = (plane_y0 + y) * component.plane_width + plane_x0;
                        component.plane[row_off..row_off + 8].copy_from_slice(&block[y * 8..y * 8 + 8]);
                    }
                }
            }
        }

        Ok(())
    }

    fn finish(&self) -> DecodedImage
    {
        let mut rgba = vec![0u8; self.width * self.height * 4];

        if self.components.len() == 1
        {
            let comp = &self.components[0];

            for i in 0..self.height
            {
                for j in 0..self.width
                {
                    let y = comp.plane[i * comp.plane_width + j];
                    let pixel = color_convert::gray_to_rgba(y);
                    let off = (i * self.width + j) * 4;
                    rgba[off..off + 4].copy_from_slice(&pixel);
                }
            }
        }
        else
        {
            let y_comp = &self.components[0];
            let cb_comp = &self.components[1];
            let cr_comp = &self.components[2];

            for i in 0..self.height
            {
                for j in 0..self.width
                {
                    let y = sample_component(y_comp, self.hmax, self.vmax, i, j);
                    let cb = sample_component(cb_comp, self.hmax, self.vmax, i, j);
                    let cr = sample_component(cr_comp, self.hmax, self.vmax, i, j);

                    let pixel = color_convert::ycbcr_to_rgba(y, cb, cr);
                    let off = (i * self.width + j) * 4;
                    rgba[off..off + 4].copy_from_slice(&pixel);
                }
            }
        }

        DecodedImage::new(rgba, self.width, self.height)
    }
}

/// Nearest-neighbour sample of a (possibly subsampled) component plane at
/// full-resolution pixel position `(i, j)`.
fn sample_component(component: &Component, hmax: u8, vmax: u8, i: usize, j: usize) -> u8
{
    let v_scale = usize::from(vmax) / usize::from(component.v);
    let h_scale = usize::from(hmax) / usize::from(component.h);

    component.plane[(i / v_scale) * component.plane_width + (j / h_scale)]
}

fn decode_block(
    dc_table: &HuffmanTable, ac_table: &HuffmanTable, quant: &[u16; 64], dc_pred: &mut i32,
    reader: &mut ZByteReader
) -> Result<[u8; 64], JpegErrors>
{
    let mut zigzag = [0i32; 64];

    let category = huffman_decode(dc_table, reader)? as u8;

    if category > 16
    {
        return Err(JpegErrors::GenericStatic("DC coefficient category exceeds 16"));
    }

    let bits = if category > 0 { reader.take_bits_msb(category)? } else { 0 };

    *dc_pred += extend(bits, category);
    zigzag[0] = *dc_pred;

    let mut pos = 1usize;

    while pos <= 63
    {
        let symbol = huffman_decode(ac_table, reader)?;
        let run = usize::from(symbol >> 4);
        let size = (symbol & 0x0F) as u8;

        if run == 0 && size == 0
        {
            break;
        }

        if run == 15 && size == 0
        {
            pos += 16;
            continue;
        }

        pos += run;
        if pos > 63
        {
            return Err(JpegErrors::GenericStatic("AC coefficient run advanced past the end of the block"));
        }

        let bits = if size > 0 { reader.take_bits_msb(size)? } else { 0 };
        zigzag[pos] = extend(bits, size);

        pos += 1;
    }

    for (k, coeff) in zigzag.iter_mut().enumerate()
    {
        *coeff *= i32::from(quant[k]);
    }

    let mut natural = [0i32; 64];
    for (k, &coeff) in zigzag.iter().enumerate()
    {
        natural[UN_ZIGZAG[k]] = coeff;
    }

    Ok(idct_block(&natural))
}

fn huffman_decode(table: &HuffmanTable, reader: &mut ZByteReader) -> Result<u16, JpegErrors>
{
    table
        .decode(|| reader.take_huffman_bit_msb())
        .map_err(|_| JpegErrors::GenericStatic("invalid Huffman code in entropy-coded data"))
}

/// Sign-extend a `t`-bit magnitude value per the JPEG DC/AC EXTEND rule.
fn extend(v: u32, t: u8) -> i32
{
    if t == 0
    {
        return 0;
    }

    let v = v as i32;
    if v < (1 << (t - 1))
    {
        v - ((1 << t) - 1)
    }
    else
    {
        v
    }
}

/// Consume one marker, skipping any run of `0xFF` fill bytes that precede
/// it.
fn next_marker(stream: &mut ZByteReader) -> Result<u8, JpegErrors>
{
    let mut byte = stream.get_u8_err()?;

    if byte != 0xFF
    {
        return Err(JpegErrors::GenericStatic("expected a marker"));
    }

    loop
    {
        byte = stream.get_u8_err()?;
        if byte != 0xFF
        {
            return Ok(byte);
        }
    }
}

/// Walk the entropy-coded data from the current (byte-aligned) position,
/// destuffing `0xFF 0x00` pairs and splitting on restart markers, stopping
/// at EOI. Each returned segment is ready to be read bit-by-bit on its own,
/// byte-aligned `ZByteReader`.
fn split_entropy_segments(stream: &mut ZByteReader) -> Result<Vec<Vec<u8>>, JpegErrors>
{
    let mut segments = Vec::new();
    let mut current = Vec::new();

    loop
    {
        let byte = stream.get_u8_err()?;

        if byte != 0xFF
        {
            current.push(byte);
            continue;
        }

        let marker = stream.get_u8_err()?;

        match marker
        {
            0x00 => current.push(0xFF),
            0xFF => stream.rewind(1),
            MARKER_RST0..=MARKER_RST7 => segments.push(std::mem::take(&mut current)),
            MARKER_EOI =>
            {
                segments.push(std::mem::take(&mut current));
                break;
            }
            other =>
            {
                return Err(JpegErrors::Generic(format!(
                    "unexpected marker 0xFF{other:02X} inside entropy-coded data"
                )));
            }
        }
    }

    Ok(segments)
}

fn ceil_div(a: usize, b: usize) -> usize
{
    (a + b - 1) / b
}
