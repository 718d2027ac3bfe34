//! The colour interpretation of a decoded pixel buffer.
//!
//! Every frontend in this workspace ultimately hands the caller RGBA8
//! pixels, but decoders need an intermediate notion of colourspace while
//! they are still working with source samples (e.g. PNG gray+alpha before
//! it is expanded, or JPEG's YCbCr before colour conversion).
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace
{
    RGB,
    RGBA,
    YCbCr,
    Luma,
    LumaA,
    Unknown
}
impl ColorSpace
{
    /// Number of samples a single pixel in this colourspace carries.
    pub const fn num_components(self) -> usize
    {
        match self
        {
            Self::RGB | Self::YCbCr => 3,
            Self::RGBA => 4,
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::Unknown => 0
        }
    }
}
