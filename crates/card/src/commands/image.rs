//! Single-chunk image read and write commands.
//!
//! The byte offset into the card-side buffer travels in P1/P2
//! (high byte / low byte). The transfer engine in [`crate::transfer`]
//! sequences these commands to move data larger than one APDU.

use bytes::Bytes;
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::MAX_CHUNK;
use crate::credential::PinCredential;

/// Writes one chunk of image data at a byte offset.
#[derive(Debug, Clone)]
pub struct WriteChunkCommand {
    ins: u8,
    offset: u16,
    data: Bytes,
}

impl WriteChunkCommand {
    /// Build a write of `data` at `offset` under instruction `ins`
    pub fn at_offset(ins: u8, offset: u16, data: Bytes) -> Self {
        Self { ins, offset, data }
    }
}

impl ApduCommand for WriteChunkCommand {
    type Success = Response;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        crate::constants::CLA_APP
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        (self.offset >> 8) as u8
    }

    fn p2(&self) -> u8 {
        self.offset as u8
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        Ok(response)
    }
}

/// Reads one chunk of image data at a byte offset.
/// Payload carries the length-prefixed PIN; Le requests a full chunk.
#[derive(Debug, Clone)]
pub struct ReadChunkCommand {
    ins: u8,
    offset: u16,
    data: Bytes,
}

impl ReadChunkCommand {
    /// Build a read at `offset` under instruction `ins`
    pub fn at_offset(ins: u8, offset: u16, pin: &PinCredential) -> Self {
        Self {
            ins,
            offset,
            data: Bytes::from(pin.prefixed()),
        }
    }
}

impl ApduCommand for ReadChunkCommand {
    type Success = Response;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        crate::constants::CLA_APP
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        (self.offset >> 8) as u8
    }

    fn p2(&self) -> u8 {
        self.offset as u8
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn expected_length(&self) -> Option<u8> {
        Some(MAX_CHUNK as u8)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_split_across_p1_p2() {
        let cmd = WriteChunkCommand::at_offset(0x10, 0x01F0, Bytes::from_static(&[0xAA]));
        assert_eq!(cmd.p1(), 0x01);
        assert_eq!(cmd.p2(), 0xF0);
    }

    #[test]
    fn test_read_chunk_carries_pin_and_le() {
        let pin = PinCredential::new("1234");
        let cmd = ReadChunkCommand::at_offset(0x12, 0, &pin);
        assert_eq!(cmd.data().unwrap(), &[0x04, b'1', b'2', b'3', b'4']);
        assert_eq!(cmd.expected_length(), Some(240));
    }

    #[test]
    fn test_write_chunk_wire_format() {
        let cmd = WriteChunkCommand::at_offset(0x10, 0x00F0, Bytes::from_static(&[0x01, 0x02]));
        let bytes = cmd.to_bytes();
        assert_eq!(bytes.as_ref(), &[0xA0, 0x10, 0x00, 0xF0, 0x02, 0x01, 0x02]);
    }
}
