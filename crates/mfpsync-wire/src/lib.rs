//! Primitive codec and packet framing for the MyFitnessPal sync protocol.
//!
//! This is the lowest layer of mfpsync. Every packet is framed with:
//! - A 2-byte magic number (0x04D3)
//! - A 4-byte big-endian total length, header included
//! - A 2-byte reserved field (always 1 on write)
//! - A 2-byte big-endian type tag
//!
//! Bodies are built from big-endian integers and floats, u16-prefixed UTF-8
//! strings, raw 16-byte UUIDs, fixed-width ASCII dates and timestamps, and
//! externally counted key/value maps.

pub mod config;
pub mod error;
pub mod header;
pub mod reader;
pub mod tag;
pub mod writer;

pub use config::{WireConfig, DEFAULT_MAX_PACKET_LENGTH};
pub use error::{Result, WireError};
pub use header::{PacketHeader, PacketSpan, HEADER_SIZE, MAGIC, RESERVED};
pub use reader::{WireReader, DATE_LEN, TIMESTAMP_LEN, UUID_LEN};
pub use writer::{PositionGuard, WireWriter};
