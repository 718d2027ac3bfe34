//! The naive separable 2D inverse DCT, computed directly from its
//! trigonometric definition rather than a fast butterfly network. Baseline
//! images are small enough per-block that this is not worth complicating.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use raster_core::sample::clamp;

/// Run the inverse DCT on a dequantized, de-zigzagged 8x8 block (row-major,
/// `coeffs[v * 8 + u]`), level-shift by 128 and clamp to `[0, 255]`.
pub fn idct_block(coeffs: &[i32; 64]) -> [u8; 64]
{
    let mut out = [0u8; 64];

    for y in 0..8
    {
        for x in 0..8
        {
            let mut sum = 0.0f32;

            for v in 0..8
            {
                let c_v = if v == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                let cos_vy = cos_term(y, v);

                for u in 0..8
                {
                    let c_u = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                    let s = coeffs[v * 8 + u] as f32;

                    sum += c_u * c_v * s * cos_term(x, u) * cos_vy;
                }
            }

            let sample = (sum / 4.0).round() as i32 + 128;
            out[y * 8 + x] = clamp(sample);
        }
    }

    out
}

fn cos_term(pos: usize, freq: usize) -> f32
{
    (((2 * pos + 1) as f32) * (freq as f32) * PI / 16.0).cos()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn dc_only_block_is_flat()
    {
        let mut coeffs = [0i32; 64];
        // A DC-only coefficient produces a perfectly flat block: every
        // output sample is the same value.
        coeffs[0] = 16;

        let block = idct_block(&coeffs);
        let first = block[0];

        assert!(block.iter().all(|&s| s == first));
    }

    #[test]
    fn all_zero_block_is_mid_gray()
    {
        let coeffs = [0i32; 64];
        let block = idct_block(&coeffs);

        assert!(block.iter().all(|&s| s == 128));
    }
}
