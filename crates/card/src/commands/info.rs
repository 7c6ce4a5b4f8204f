//! UPDATE INFO and GET INFO commands
//!
//! The personal info record is stored on the card in 16-byte blocks.
//! Text is zero-padded up to the next block boundary before upload;
//! trailing zero bytes are stripped on retrieval.

use bytes::{BufMut, Bytes, BytesMut};
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, INFO_BLOCK, ins};
use crate::credential::PinCredential;

/// Pads `text` with zero bytes to the next multiple of [`INFO_BLOCK`].
/// Already-aligned input is returned unchanged.
pub(crate) fn pad_to_block(text: &str) -> Vec<u8> {
    let mut buf = text.as_bytes().to_vec();
    let rem = buf.len() % INFO_BLOCK;
    if rem != 0 {
        buf.resize(buf.len() + (INFO_BLOCK - rem), 0);
    }
    buf
}

/// UPDATE INFO command: replaces the card's personal info record.
/// Payload: `[pin length (1)] [pin] [zero-padded text]`
#[derive(Debug, Clone)]
pub struct UpdateInfoCommand {
    data: Bytes,
}

impl UpdateInfoCommand {
    /// Build the payload from the PIN and the record text
    pub fn with_text(pin: &PinCredential, text: &str) -> Self {
        let padded = pad_to_block(text);
        let mut data = BytesMut::with_capacity(pin.overhead() + padded.len());
        data.put_slice(&pin.prefixed());
        data.put_slice(&padded);
        Self {
            data: data.freeze(),
        }
    }
}

impl ApduCommand for UpdateInfoCommand {
    type Success = ();
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::UPDATE_INFO
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        match response.outcome() {
            Outcome::Success => Ok(()),
            Outcome::SecurityNotSatisfied => Err(Error::SecurityPrecondition("PIN required")),
            _ => Err(Error::from_status(response.status())),
        }
    }
}

/// GET INFO command: retrieves the personal info record.
/// Payload: `[pin length (1)] [pin]`
#[derive(Debug, Clone)]
pub struct GetInfoCommand {
    data: Bytes,
}

impl GetInfoCommand {
    /// Build the payload from the PIN
    pub fn with_pin(pin: &PinCredential) -> Self {
        Self {
            data: Bytes::from(pin.prefixed()),
        }
    }
}

impl ApduCommand for GetInfoCommand {
    type Success = String;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::GET_INFO
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        match response.outcome() {
            Outcome::Success => {
                let data = response.data();
                let end = data
                    .iter()
                    .rposition(|&b| b != 0)
                    .map_or(0, |pos| pos + 1);
                Ok(String::from_utf8_lossy(&data[..end]).into_owned())
            }
            Outcome::SecurityNotSatisfied => Err(Error::SecurityPrecondition("PIN required")),
            _ => Err(Error::from_status(response.status())),
        }
    }
}
