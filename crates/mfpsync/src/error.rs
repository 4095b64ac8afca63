use mfpsync_records::RecordError;
use mfpsync_transport::TransportError;

/// Errors that can occur during a sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Encoding the request or decoding the response failed.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// The exchange with the server failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server refused the request.
    #[error("sync rejected with status {code} ({status}): {message}")]
    Rejected {
        code: i16,
        status: &'static str,
        message: String,
    },

    /// The server kept reporting more data past the configured round limit.
    #[error("sync did not finish within {max} rounds")]
    TooManyRounds { max: u32 },
}

pub type Result<T> = std::result::Result<T, SyncError>;
