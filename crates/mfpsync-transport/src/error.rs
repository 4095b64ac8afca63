/// Errors that can occur while exchanging sync buffers.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred while talking to the server.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client failed before a response was received.
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The server answered with a non-success status code.
    #[error("server responded with HTTP status {code}")]
    Status { code: u16 },

    /// A replay transport has no recorded responses left.
    #[error("no recorded responses left to replay")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, TransportError>;
