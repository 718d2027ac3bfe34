/// The "8BPS" file signature, read big-endian.
pub const PSD_SIGNATURE: u32 = 0x3842_5053;

/// The only channel count this decoder accepts: R, G, B planes.
pub const SUPPORTED_CHANNELS: u16 = 3;

/// The only color mode this decoder accepts.
pub const COLOR_MODE_RGB: u16 = 3;
