#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor
{
    Luma,
    RGB,
    Palette,
    LumaA,
    RGBA,
    #[default]
    Unknown
}

impl PngColor
{
    pub fn from_int(value: u8) -> Option<PngColor>
    {
        match value
        {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    /// Number of raw samples per pixel this color type carries on the wire,
    /// before any palette/tRNS expansion to RGBA8.
    pub const fn samples_per_pixel(self) -> u8
    {
        match self
        {
            Self::Luma | Self::Palette => 1,
            Self::LumaA => 2,
            Self::RGB => 3,
            Self::RGBA => 4,
            Self::Unknown => 0
        }
    }
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum FilterMethod
{
    #[default]
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterMethod
{
    pub fn from_int(value: u8) -> Option<FilterMethod>
    {
        match value
        {
            0 => Some(Self::None),
            1 => Some(Self::Sub),
            2 => Some(Self::Up),
            3 => Some(Self::Average),
            4 => Some(Self::Paeth),
            _ => None
        }
    }
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum InterlaceMethod
{
    #[default]
    Standard,
    Adam7
}

impl InterlaceMethod
{
    pub fn from_int(value: u8) -> Option<InterlaceMethod>
    {
        match value
        {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType
{
    IHDR,
    PLTE,
    IDAT,
    IEND,
    TRNS,
    Unknown
}
