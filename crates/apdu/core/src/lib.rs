//! Core types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types for talking to a contact smart
//! card according to ISO/IEC 7816-4:
//!
//! - Building command APDUs and parsing response APDUs
//! - Interpreting status words into semantic [`Outcome`]s
//! - An abstract [`CardTransport`] over which commands travel, plus a
//!   scripted [`MockTransport`](transport::MockTransport) for tests
//!
//! Everything here is transport-agnostic; the PC/SC binding lives in a
//! separate crate.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod error;
pub mod response;
pub mod transport;

pub use command::{ApduCommand, Command};
pub use error::{Error, Result};
pub use response::Response;
pub use response::status::{Outcome, StatusWord};
pub use transport::CardTransport;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    // Core types
    pub use crate::{Bytes, BytesMut, Error};

    // Command related
    pub use crate::command::{ApduCommand, Command};

    // Response related
    pub use crate::response::Response;
    pub use crate::response::status::{Outcome, StatusWord, common as status};
    pub use crate::response::utils::Cursor;

    // Transport layer
    pub use crate::transport::CardTransport;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.class(), 0x00);
        assert_eq!(cmd.instruction(), 0xA4);
        assert_eq!(cmd.p1(), 0x04);
        assert_eq!(cmd.p2(), 0x00);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let resp = Response::success(Some(data.clone()));
        assert!(resp.is_success());
        assert_eq!(resp.payload(), Some(&data));
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
