use log::{debug, trace};
use raster_core::bytestream::ZByteReader;
use raster_core::huffman::{HuffmanDecodeError, HuffmanTable};

use crate::constants::{
    fixed_dist_lengths, fixed_litlen_lengths, DEFLATE_MAX_CODEWORD_LENGTH, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION, DIST_BASE, DIST_BITS, END_OF_BLOCK, LEN_BASE, LEN_BITS
};
use crate::errors::InflateErrors;

/// Decompress a zlib-wrapped DEFLATE payload into a buffer of exactly
/// `output_size` bytes.
///
/// `output_size` must be known up front (PNG's `IHDR` gives it); there is
/// no streaming/incremental variant in this crate.
pub fn decode_zlib(data: &[u8], output_size: usize) -> Result<Vec<u8>, InflateErrors>
{
    let mut reader = ZByteReader::new(data);

    let cmf = reader.get_u8_err().map_err(|_| InflateErrors::UnexpectedEof)?;
    let _flg = reader.get_u8_err().map_err(|_| InflateErrors::UnexpectedEof)?;

    if cmf & 0x0F != 8
    {
        return Err(InflateErrors::BadZlibHeader);
    }

    debug!("zlib header ok, decompressing into {output_size} bytes");

    decode_deflate(&mut reader, output_size)
}

fn decode_deflate(reader: &mut ZByteReader, output_size: usize) -> Result<Vec<u8>, InflateErrors>
{
    let mut out = Vec::with_capacity(output_size);

    loop
    {
        let bfinal = next_bit(reader)?;
        let btype = take_bits_lsb(reader, 2)?;

        match btype
        {
            0 => decode_stored(reader, &mut out, output_size)?,
            1 =>
            {
                let litlen = HuffmanTable::build(&fixed_litlen_lengths(), DEFLATE_MAX_CODEWORD_LENGTH)
                    .map_err(|_| InflateErrors::BadHuffmanTable)?;
                let dist = HuffmanTable::build(&fixed_dist_lengths(), DEFLATE_MAX_CODEWORD_LENGTH)
                    .map_err(|_| InflateErrors::BadHuffmanTable)?;

                decode_compressed_block(reader, &mut out, output_size, &litlen, &dist)?;
            }
            2 =>
            {
                let (litlen, dist) = read_dynamic_tables(reader)?;
                decode_compressed_block(reader, &mut out, output_size, &litlen, &dist)?;
            }
            _ => return Err(InflateErrors::BadBlockType)
        }

        if bfinal == 1
        {
            break;
        }

        if out.len() >= output_size
        {
            break;
        }
    }

    if out.len() != output_size
    {
        return Err(InflateErrors::OutputUnderfilled);
    }

    trace!("deflate stream fully decoded");
    Ok(out)
}

fn decode_stored(
    reader: &mut ZByteReader, out: &mut Vec<u8>, output_size: usize
) -> Result<(), InflateErrors>
{
    reader.align_to_byte();

    let len = reader
        .get_u16_le()
        .map_err(|_| InflateErrors::UnexpectedEof)?;
    let nlen = reader
        .get_u16_le()
        .map_err(|_| InflateErrors::UnexpectedEof)?;

    if len ^ nlen != 0xFFFF
    {
        return Err(InflateErrors::BadStoredBlockLength);
    }

    let bytes = reader
        .get(usize::from(len))
        .map_err(|_| InflateErrors::UnexpectedEof)?;

    if out.len() + bytes.len() > output_size
    {
        return Err(InflateErrors::OutputOverrun);
    }

    out.extend_from_slice(bytes);
    Ok(())
}

fn read_dynamic_tables(
    reader: &mut ZByteReader
) -> Result<(HuffmanTable, HuffmanTable), InflateErrors>
{
    let hlit = take_bits_lsb(reader, 5)? as usize + 257;
    let hdist = take_bits_lsb(reader, 5)? as usize + 1;
    let hclen = take_bits_lsb(reader, 4)? as usize + 4;

    let mut precode_lengths = [0u8; DEFLATE_NUM_PRECODE_SYMS];

    for i in 0..hclen
    {
        precode_lengths[DEFLATE_PRECODE_LENS_PERMUTATION[i] as usize] = take_bits_lsb(reader, 3)? as u8;
    }

    let precode = HuffmanTable::build(&precode_lengths, DEFLATE_MAX_CODEWORD_LENGTH)
        .map_err(|_| InflateErrors::BadHuffmanTable)?;

    let mut lengths = Vec::with_capacity(hlit + hdist);

    while lengths.len() < hlit + hdist
    {
        let symbol = decode_huffman_symbol(reader, &precode)?;

        match symbol
        {
            0..=15 => lengths.push(symbol as u8),
            16 =>
            {
                let prev = *lengths.last().ok_or(InflateErrors::BadHuffmanTable)?;
                let repeat = take_bits_lsb(reader, 2)? + 3;
                for _ in 0..repeat
                {
                    lengths.push(prev);
                }
            }
            17 =>
            {
                let repeat = take_bits_lsb(reader, 3)? + 3;
                for _ in 0..repeat
                {
                    lengths.push(0);
                }
            }
            18 =>
            {
                let repeat = take_bits_lsb(reader, 7)? + 11;
                for _ in 0..repeat
                {
                    lengths.push(0);
                }
            }
            _ => return Err(InflateErrors::BadHuffmanTable)
        }
    }

    if lengths.len() != hlit + hdist
    {
        return Err(InflateErrors::BadHuffmanTable);
    }

    let litlen = HuffmanTable::build(&lengths[..hlit], DEFLATE_MAX_CODEWORD_LENGTH)
        .map_err(|_| InflateErrors::BadHuffmanTable)?;
    let dist = HuffmanTable::build(&lengths[hlit..], DEFLATE_MAX_CODEWORD_LENGTH)
        .map_err(|_| InflateErrors::BadHuffmanTable)?;

    Ok((litlen, dist))
}

fn decode_compressed_block(
    reader: &mut ZByteReader, out: &mut Vec<u8>, output_size: usize, litlen: &HuffmanTable,
    dist: &HuffmanTable
) -> Result<(), InflateErrors>
{
    loop
    {
        let symbol = decode_huffman_symbol(reader, litlen)?;

        if symbol == END_OF_BLOCK
        {
            return Ok(());
        }

        if symbol < END_OF_BLOCK
        {
            if out.len() >= output_size
            {
                return Err(InflateErrors::OutputOverrun);
            }
            out.push(symbol as u8);
            continue;
        }

        let len_idx = (symbol - 257) as usize;
        if len_idx >= LEN_BASE.len()
        {
            return Err(InflateErrors::BadHuffmanTable);
        }

        let length =
            LEN_BASE[len_idx] as usize + take_bits_lsb(reader, LEN_BITS[len_idx])? as usize;

        let dist_symbol = decode_huffman_symbol(reader, dist)? as usize;
        if dist_symbol >= DIST_BASE.len()
        {
            return Err(InflateErrors::BadHuffmanTable);
        }

        let distance =
            DIST_BASE[dist_symbol] as usize + take_bits_lsb(reader, DIST_BITS[dist_symbol])? as usize;

        if distance > out.len()
        {
            return Err(InflateErrors::DistanceTooFar);
        }

        if out.len() + length > output_size
        {
            return Err(InflateErrors::OutputOverrun);
        }

        let start = out.len() - distance;
        for i in 0..length
        {
            let byte = out[start + i];
            out.push(byte);
        }
    }
}

fn decode_huffman_symbol(reader: &mut ZByteReader, table: &HuffmanTable) -> Result<u16, InflateErrors>
{
    table
        .decode(|| reader.take_huffman_bit_lsb())
        .map_err(|e| match e
        {
            HuffmanDecodeError::Bitstream(_) => InflateErrors::UnexpectedEof,
            HuffmanDecodeError::InvalidCode(_) => InflateErrors::BadHuffmanTable
        })
}

fn next_bit(reader: &mut ZByteReader) -> Result<u32, InflateErrors>
{
    reader
        .take_huffman_bit_lsb()
        .map_err(|_| InflateErrors::UnexpectedEof)
}

fn take_bits_lsb(reader: &mut ZByteReader, n: u8) -> Result<u32, InflateErrors>
{
    if n == 0
    {
        return Ok(0);
    }
    reader
        .take_bits_lsb(n)
        .map_err(|_| InflateErrors::UnexpectedEof)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn stored_block_round_trips_hello()
    {
        let data = [
            0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'
        ];

        let out = decode_zlib(&data, 5).unwrap();
        assert_eq!(out, b"Hello");
    }

    #[test]
    fn stored_block_rejects_bad_nlen()
    {
        let data = [
            0x78, 0x01, 0x01, 0x05, 0x00, 0x00, 0x00, b'H', b'e', b'l', b'l', b'o'
        ];

        assert!(decode_zlib(&data, 5).is_err());
    }

    #[test]
    fn bad_cmf_nibble_is_rejected()
    {
        let data = [0x77, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF];
        assert!(decode_zlib(&data, 0).is_err());
    }

    #[test]
    fn fixed_table_construction_succeeds()
    {
        let lens = fixed_litlen_lengths();
        assert!(HuffmanTable::build(&lens, DEFLATE_MAX_CODEWORD_LENGTH).is_ok());
    }

    #[test]
    fn match_beyond_output_start_is_rejected()
    {
        let litlen = HuffmanTable::build(&fixed_litlen_lengths(), DEFLATE_MAX_CODEWORD_LENGTH).unwrap();
        let dist = HuffmanTable::build(&fixed_dist_lengths(), DEFLATE_MAX_CODEWORD_LENGTH).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let mut reader = ZByteReader::new(&[]);
        let result = decode_compressed_block(&mut reader, &mut out, 10, &litlen, &dist);
        assert!(result.is_err());
    }
}
