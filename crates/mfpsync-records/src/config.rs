use mfpsync_wire::WireConfig;

/// Controls a [`DecodeSession`](crate::DecodeSession) pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// When true, the data record count is checked against the count declared
    /// by the sync result at the end of the pass.
    pub verify_record_count: bool,
    /// Primitive and framing limits.
    pub wire: WireConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verify_record_count: true,
            wire: WireConfig::default(),
        }
    }
}
