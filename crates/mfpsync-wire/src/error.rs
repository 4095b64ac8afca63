/// Errors that can occur while reading or writing wire primitives and packet headers.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remain in the buffer than the primitive requires.
    #[error("truncated input (needed {needed} bytes, {available} available)")]
    Truncated { needed: usize, available: usize },

    /// A string field does not contain valid UTF-8.
    #[error("string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A date field does not match `YYYY-MM-DD`.
    #[error("invalid date text {text:?} (expected YYYY-MM-DD)")]
    InvalidDate { text: String },

    /// A timestamp field does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp text {text:?} (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidTimestamp { text: String },

    /// A date or timestamp whose year cannot be rendered in the fixed-width pattern.
    #[error("{value} cannot be encoded in the fixed-width {width}-byte format")]
    DateOutOfRange { value: String, width: usize },

    /// A string is too long for its 2-byte length prefix.
    #[error("string too long ({len} bytes, max {max})")]
    StringTooLong { len: usize, max: usize },

    /// The packet header contains an invalid magic number.
    #[error("invalid packet magic 0x{found:04X} (expected 0x04D3)")]
    InvalidMagic { found: u16 },

    /// The packet header declares a length smaller than the header itself.
    #[error("invalid packet length {length} (shorter than the header)")]
    InvalidLength { length: i32 },

    /// The packet exceeds the configured maximum size.
    #[error("packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// A seek targeted a position outside the buffer.
    #[error("cannot seek to {position} (buffer length {len})")]
    InvalidSeek { position: usize, len: usize },
}

impl WireError {
    /// True when the error is a short read rather than malformed content.
    pub fn is_truncated(&self) -> bool {
        matches!(self, WireError::Truncated { .. })
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
