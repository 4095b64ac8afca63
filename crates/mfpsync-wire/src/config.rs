/// Default maximum packet size, header included: the largest length the
/// i32 header field can express.
pub const DEFAULT_MAX_PACKET_LENGTH: usize = i32::MAX as usize;

/// Configuration shared by [`WireReader`](crate::WireReader) and
/// [`WireWriter`](crate::WireWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConfig {
    /// Largest packet length accepted on decode or produced on encode.
    ///
    /// Lowering it makes oversized packets fail with `PacketTooLarge`.
    pub max_packet_length: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_packet_length: DEFAULT_MAX_PACKET_LENGTH,
        }
    }
}
