use mfpsync_wire::WireError;

/// Errors that can occur while decoding or encoding records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Primitive or framing error.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The body decoder stopped short of, or ran past, the declared packet end.
    #[error(
        "packet type {tag} finished at offset {actual_end}, expected to finish at {expected_end}"
    )]
    Inconsistent {
        tag: u16,
        expected_end: usize,
        actual_end: usize,
    },

    /// The number of data records differs from the count declared by the sync result.
    #[error("expected {expected} records, received {received}")]
    CountMismatch { expected: i32, received: u64 },

    /// The body layout for this packet type is unknown.
    ///
    /// Decoding recovers from this by capturing the body as an opaque record.
    #[error("packet body layout not implemented")]
    NotImplemented,

    /// The record has no encoder for its packet type.
    #[error("encoding packet type {tag} is not implemented")]
    EncodeNotImplemented { tag: u16 },

    /// A collection has more items than its count field can express.
    #[error("collection too large ({count} items, max {max})")]
    CountOverflow { count: usize, max: usize },

    /// No sync status uses this message.
    #[error("unknown status message {0:?}")]
    UnknownStatusMessage(String),
}

impl RecordError {
    /// True when the underlying failure is a short read.
    pub fn is_truncated(&self) -> bool {
        matches!(self, RecordError::Wire(err) if err.is_truncated())
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
