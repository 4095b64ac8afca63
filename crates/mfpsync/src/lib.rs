//! Codec and client for the MyFitnessPal binary sync protocol.
//!
//! # Crate Structure
//!
//! - [`wire`]: primitive codec and packet framing
//! - [`records`]: typed records, tag registry, and stream decoding
//! - [`transport`]: request/response seam, multipart POST framing, replay
//! - [`sync`]: pagination driver following continuation pointers
//! - [`logging`]: stderr subscriber setup (behind `logging` feature)

/// Re-export wire types.
pub mod wire {
    pub use mfpsync_wire::*;
}

/// Re-export record types.
pub mod records {
    pub use mfpsync_records::*;
}

/// Re-export transport types.
pub mod transport {
    pub use mfpsync_transport::*;
}

pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod sync;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use sync::{SyncClient, SyncOutcome, UpgradeNotice};
