//! Error types for the PC/SC transport

/// Error type for PC/SC operations
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// Error reported by the PC/SC service
    #[error(transparent)]
    Pcsc(#[from] pcsc::Error),

    /// No reader with the given name is attached
    #[error("reader not found: {0}")]
    ReaderNotFound(String),

    /// The named reader has no card inserted
    #[error("no card present in reader: {0}")]
    NoCard(String),

    /// Reader name contained an interior NUL byte
    #[error("invalid reader name")]
    InvalidReaderName,
}

impl From<PcscError> for tessera_apdu_core::Error {
    fn from(error: PcscError) -> Self {
        Self::transport(error)
    }
}
