//! APDU response definitions
//!
//! A response APDU is the optional data field followed by the two mandatory
//! status bytes SW1 SW2.

pub mod status;
pub mod utils;

use bytes::Bytes;

use crate::error::{Error, Result};
use status::{Outcome, StatusWord};

/// A parsed response APDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Option<Bytes>,
    status: StatusWord,
}

impl Response {
    /// Create a response from its parts
    pub const fn new(payload: Option<Bytes>, status: StatusWord) -> Self {
        Self { payload, status }
    }

    /// Create a success (0x9000) response with optional payload
    pub const fn success(payload: Option<Bytes>) -> Self {
        Self::new(payload, status::common::SW_NO_ERROR)
    }

    /// Parse a raw response: everything before the final two bytes is data,
    /// the final two bytes are the status word.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::InvalidResponse);
        }

        let (data, sw) = bytes.split_at(bytes.len() - 2);
        let payload = if data.is_empty() {
            None
        } else {
            Some(Bytes::copy_from_slice(data))
        };

        Ok(Self::new(payload, StatusWord::new(sw[0], sw[1])))
    }

    /// Get the response payload, if any
    pub const fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Get the response data as a slice (empty when there is no payload)
    pub fn data(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Whether the status word is 0x9000
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Classify the status word into a semantic outcome
    pub const fn outcome(&self) -> Outcome {
        self.status.outcome()
    }
}
