//! Error types for applet operations

use tessera_apdu_core::{Outcome, StatusWord};

/// Result type for applet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for applet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or codec level errors
    #[error(transparent)]
    Apdu(#[from] tessera_apdu_core::Error),

    /// The applet refused SELECT
    #[error("applet selection failed")]
    AppletSelectionFailed,

    /// Caller passed a malformed argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The card returned a non-success status word with no finer meaning
    #[error("card rejected command, status word {0}")]
    CardRejected(StatusWord),

    /// Wrong PIN presented
    #[error("wrong PIN, {remaining} tries remaining")]
    WrongPin {
        /// Verification attempts left before the PIN locks
        remaining: u8,
    },

    /// The PIN object is blocked
    #[error("PIN is locked")]
    PinLocked,

    /// A PIN or secure-state precondition was not met
    #[error("{0}")]
    SecurityPrecondition(&'static str),

    /// A chunked transfer failed partway through
    #[error("transfer aborted at offset {offset}, status word {status}")]
    TransferAborted {
        /// Offset of the chunk that failed
        offset: u16,
        /// Status word the card answered with
        status: StatusWord,
    },
}

impl Error {
    /// Map a non-success status word onto the error taxonomy.
    ///
    /// Used by commands that have no operation-specific message for an
    /// outcome; callers needing one match on the outcome themselves first.
    pub(crate) fn from_status(status: StatusWord) -> Self {
        match status.outcome() {
            Outcome::Locked => Self::PinLocked,
            Outcome::WrongPin { remaining } => Self::WrongPin { remaining },
            Outcome::SecurityNotSatisfied => {
                Self::SecurityPrecondition("security status not satisfied")
            }
            Outcome::Success | Outcome::WrongLength | Outcome::Failure(_) => {
                Self::CardRejected(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_status(StatusWord::from_u16(0x6983)),
            Error::PinLocked
        ));
        assert!(matches!(
            Error::from_status(StatusWord::from_u16(0x63C5)),
            Error::WrongPin { remaining: 5 }
        ));
        assert!(matches!(
            Error::from_status(StatusWord::from_u16(0x6A82)),
            Error::CardRejected(sw) if sw.to_u16() == 0x6A82
        ));
    }
}
