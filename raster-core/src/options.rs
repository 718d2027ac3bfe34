//! Decoder options
//!
//! A single [`DecoderOptions`] struct is shared by every frontend in this
//! workspace so that a caller configures once instead of learning a
//! per-format options type.
//!
//! Not every decoder respects every option; each field documents who reads
//! it.

/// Options that influence how a decoder behaves.
///
/// Built with the chaining setter pattern: every setter takes `self` by
/// value and returns `Self`, so options can be built up in one expression:
///
/// ```
/// use raster_core::options::DecoderOptions;
///
/// let opts = DecoderOptions::default()
///     .set_max_width(4096)
///     .set_strict_mode(true);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions
{
    max_width:   usize,
    max_height:  usize,
    strict_mode: bool
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        Self {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false
        }
    }
}

impl DecoderOptions
{
    #[must_use]
    pub fn new() -> DecoderOptions
    {
        Self::default()
    }

    /// Maximum image width a decoder will attempt to allocate for.
    ///
    /// Protects against OOM from a corrupt or adversarial header declaring
    /// an enormous width.
    #[must_use]
    pub const fn get_max_width(&self) -> usize
    {
        self.max_width
    }

    #[must_use]
    pub fn set_max_width(mut self, max_width: usize) -> DecoderOptions
    {
        self.max_width = max_width;
        self
    }

    /// Maximum image height a decoder will attempt to allocate for.
    #[must_use]
    pub const fn get_max_height(&self) -> usize
    {
        self.max_height
    }

    #[must_use]
    pub fn set_max_height(mut self, max_height: usize) -> DecoderOptions
    {
        self.max_height = max_height;
        self
    }

    /// Whether a decoder should reject inputs that deviate from the strict
    /// reading of the format (duplicate headers it could otherwise shrug
    /// off, out-of-spec ancillary data, and similar). Defaults to `false`:
    /// decoders are permissive by default and only fail on inputs they
    /// truly cannot make sense of.
    #[must_use]
    pub const fn get_strict_mode(&self) -> bool
    {
        self.strict_mode
    }

    #[must_use]
    pub fn set_strict_mode(mut self, choice: bool) -> DecoderOptions
    {
        self.strict_mode = choice;
        self
    }
}
