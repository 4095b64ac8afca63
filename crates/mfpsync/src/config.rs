use mfpsync_records::sync::{
    DEFAULT_API_VERSION, DEFAULT_REQUEST_FLAGS, DEFAULT_REQUEST_KIND, DEFAULT_SVN_REVISION,
};
use mfpsync_wire::WireConfig;

/// Default upper bound on request/response rounds per sync.
pub const DEFAULT_MAX_ROUNDS: u32 = 64;

/// Settings for a [`SyncClient`](crate::SyncClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Protocol version sent in every request.
    pub api_version: i16,
    /// Client build revision sent in every request.
    pub svn_revision: i32,
    pub request_kind: i16,
    pub request_flags: i16,
    /// A sync still asking for more data after this many rounds fails.
    pub max_rounds: u32,
    /// Primitive and framing limits for requests and responses.
    pub wire: WireConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION,
            svn_revision: DEFAULT_SVN_REVISION,
            request_kind: DEFAULT_REQUEST_KIND,
            request_flags: DEFAULT_REQUEST_FLAGS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            wire: WireConfig::default(),
        }
    }
}
