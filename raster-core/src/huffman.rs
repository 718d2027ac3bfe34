//! Canonical Huffman code construction and decoding.
//!
//! A single kernel backs both DEFLATE's codes (max length 15) and JPEG's
//! (max length 16). The table is built from a per-symbol code-length vector
//! following RFC 1951's canonical-Huffman rule: shorter codes sort before
//! longer ones, and codes of equal length are assigned in increasing
//! symbol order.
//!
//! Representation: rather than a flat array indexed directly by codeword
//! value (which needs the codeword's length to disambiguate, since a short
//! codeword and a longer one can share the same numeric value), each
//! length `L` gets its first assigned codeword and the offset into a
//! `symbols` array sorted by `(length, codeword)`. Decoding walks lengths
//! from 1 upward, which is exactly JPEG's own (min, max)-per-length scheme
//! generalized to also serve DEFLATE.

/// Maximum codeword length across both DEFLATE (15) and JPEG (16).
pub const MAX_CODE_LENGTH: usize = 16;

/// A canonical Huffman decode table.
#[derive(Clone)]
pub struct HuffmanTable
{
    max_len:    u8,
    /// Number of codewords of each length.
    counts:     [u16; MAX_CODE_LENGTH + 1],
    /// The first (lexicographically smallest) codeword of each length.
    first_code: [u32; MAX_CODE_LENGTH + 1],
    /// Offset into `symbols` where this length's codewords begin.
    first_index: [u16; MAX_CODE_LENGTH + 1],
    /// Symbols, sorted by (length, codeword).
    symbols:    Vec<u16>
}

/// The code-length vector failed to form a valid canonical code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OverfullCode;

/// No codeword matched the bits consumed up to the table's maximum length.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InvalidCode;

impl HuffmanTable
{
    /// Build a canonical Huffman table from per-symbol code lengths (`0`
    /// meaning "this symbol has no code"). `max_len` bounds the lengths
    /// that may appear (15 for DEFLATE, 16 for JPEG).
    pub fn build(lengths: &[u8], max_len: u8) -> Result<HuffmanTable, OverfullCode>
    {
        assert!(max_len as usize <= MAX_CODE_LENGTH);

        let mut counts = [0u16; MAX_CODE_LENGTH + 1];

        for &len in lengths
        {
            counts[len as usize] += 1;
        }
        // symbols with length 0 carry no codeword
        counts[0] = 0;

        let mut first_code = [0u32; MAX_CODE_LENGTH + 1];
        let mut first_index = [0u16; MAX_CODE_LENGTH + 1];

        let mut code = 0u32;
        let mut index = 0u16;

        for len in 1..=max_len as usize
        {
            code = (code + u32::from(counts[len - 1])) << 1;
            first_code[len] = code;
            first_index[len] = index;
            index += counts[len];
        }

        let mut symbols = vec![0u16; index as usize];
        let mut next_code = first_code;

        for (sym, &len) in lengths.iter().enumerate()
        {
            if len == 0
            {
                continue;
            }

            let l = len as usize;

            if next_code[l] >= (1 << l)
            {
                return Err(OverfullCode);
            }

            let pos = first_index[l] + (next_code[l] - first_code[l]) as u16;
            symbols[pos as usize] = sym as u16;
            next_code[l] += 1;
        }

        Ok(HuffmanTable {
            max_len,
            counts,
            first_code,
            first_index,
            symbols
        })
    }

    /// Decode one symbol, pulling bits one at a time from `next_bit`.
    ///
    /// `next_bit` must fold each newly-consumed bit in with
    /// `(code << 1) | bit`, i.e. assemble the codeword most-significant-bit
    /// first — true regardless of whether the underlying bitstream is
    /// itself MSB- or LSB-first, since that direction only governs which
    /// bit of a byte is consumed next, not how the codeword value is
    /// built up.
    pub fn decode<E>(
        &self, mut next_bit: impl FnMut() -> Result<u32, E>
    ) -> Result<u16, HuffmanDecodeError<E>>
    {
        let mut code = 0u32;

        for len in 1..=self.max_len as usize
        {
            code = (code << 1) | next_bit().map_err(HuffmanDecodeError::Bitstream)?;

            let count = self.counts[len];

            if count != 0
            {
                let start = self.first_code[len];

                if code >= start && code - start < u32::from(count)
                {
                    let idx = self.first_index[len] + (code - start) as u16;
                    return Ok(self.symbols[idx as usize]);
                }
            }
        }

        Err(HuffmanDecodeError::InvalidCode(InvalidCode))
    }
}

/// Either the underlying bitstream ran out, or no codeword matched.
#[derive(Copy, Clone, Debug)]
pub enum HuffmanDecodeError<E>
{
    Bitstream(E),
    InvalidCode(InvalidCode)
}

#[cfg(test)]
mod tests
{
    use super::*;

    /// Fixed DEFLATE literal/length lengths: 0..143 -> 8, 144..255 -> 9,
    /// 256..279 -> 7, 280..287 -> 8.
    fn fixed_litlen_lengths() -> Vec<u8>
    {
        let mut lens = vec![0u8; 288];
        lens[0..144].fill(8);
        lens[144..256].fill(9);
        lens[256..280].fill(7);
        lens[280..288].fill(8);
        lens
    }

    #[test]
    fn build_accepts_fixed_deflate_table()
    {
        let lens = fixed_litlen_lengths();
        assert!(HuffmanTable::build(&lens, 15).is_ok());
    }

    #[test]
    fn decode_round_trips_a_tiny_table()
    {
        // symbol 0 -> code "0" (len 1), symbol 1 -> code "10" (len 2),
        // symbol 2 -> code "11" (len 2)
        let lens = [1u8, 2, 2];
        let table = HuffmanTable::build(&lens, 4).unwrap();

        let bits = [0u32, 1, 0, 1, 1];
        let mut i = 0;
        let mut next_bit = || -> Result<u32, ()> {
            let b = bits[i];
            i += 1;
            Ok(b)
        };

        assert_eq!(table.decode(&mut next_bit).unwrap(), 0);
        assert_eq!(table.decode(&mut next_bit).unwrap(), 1);
        assert_eq!(table.decode(&mut next_bit).unwrap(), 2);
    }

    #[test]
    fn overfull_code_is_rejected()
    {
        // three symbols all claiming a 1-bit code: impossible
        let lens = [1u8, 1, 1];
        assert_eq!(HuffmanTable::build(&lens, 4), Err(OverfullCode));
    }

    #[test]
    fn single_symbol_code_is_accepted()
    {
        let lens = [1u8];
        assert!(HuffmanTable::build(&lens, 4).is_ok());
    }

    #[test]
    fn empty_alphabet_builds_an_always_invalid_table()
    {
        let lens: [u8; 0] = [];
        let table = HuffmanTable::build(&lens, 4).unwrap();

        let mut next_bit = || -> Result<u32, ()> { Ok(0) };
        assert!(matches!(
            table.decode(&mut next_bit),
            Err(HuffmanDecodeError::InvalidCode(_))
        ));
    }
}
