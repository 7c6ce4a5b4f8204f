//! Error types for APDU operations

/// Result type for APDU operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for APDU operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No logical channel is open
    #[error("no card connection")]
    NotConnected,

    /// Response shorter than the mandatory two status bytes
    #[error("response too short to contain a status word")]
    InvalidResponse,

    /// Command bytes do not form a valid short APDU
    #[error("invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// Command payload exceeds the short APDU limit of 255 bytes
    #[error("command payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Response data ended before a declared field was complete
    #[error("response truncated while reading {0}")]
    TruncatedResponse(&'static str),

    /// Failure reported by the underlying transport
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Create a transport error from anything displayable
    pub fn transport<E: std::fmt::Display>(error: E) -> Self {
        Self::Transport(error.to_string())
    }
}
