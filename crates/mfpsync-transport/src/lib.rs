//! Transport seam for the MyFitnessPal sync protocol.
//!
//! A sync exchange is one request buffer out and one fully materialized
//! response buffer back. [`Transport`] is that exchange:
//! - [`MultipartTransport`] wraps an encoded request in the multipart POST
//!   body the sync endpoint expects and hands it to an [`HttpPost`] client
//! - [`ReplayTransport`] serves recorded responses for offline decoding
//!
//! No HTTP client ships with this crate; implement [`HttpPost`] over the
//! client of your choice.

pub mod error;
pub mod multipart;
pub mod replay;
pub mod traits;

pub use error::{Result, TransportError};
pub use multipart::{MultipartRequest, MultipartTransport, BOUNDARY_LEN, SYNC_URL, USER_AGENT};
pub use replay::ReplayTransport;
pub use traits::{HttpPost, HttpResponse, Transport};
