//! Helpers for decoding structured response data
//!
//! Applet responses pack several fields into one payload: fixed-width
//! fields followed by length-prefixed variable ones. [`Cursor`] walks such a
//! payload left to right and fails with a named field when the data runs
//! short.

use crate::error::{Error, Result};

/// A left-to-right reader over response data
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over the given data
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether all bytes have been consumed
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `n` bytes. `field` names the field for the error message.
    pub fn read_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedResponse(field));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a fixed-width field
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let slice = self.read_bytes(N, field)?;
        // Length checked above
        Ok(slice.try_into().unwrap())
    }

    /// Read a single byte
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_bytes(1, field)?[0])
    }

    /// Read a big-endian 16-bit value
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        let bytes = self.read_array::<2>(field)?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Read a field prefixed by its big-endian 16-bit length
    pub fn read_len_prefixed(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u16(field)? as usize;
        self.read_bytes(len, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_then_len_prefixed_fields() {
        // [id:4][len:2][body][len:2][body]
        let data = [
            0xDE, 0xAD, 0xBE, 0xEF, // id
            0x00, 0x02, 0xAA, 0xBB, // first field
            0x00, 0x01, 0x03, // second field
        ];
        let mut cursor = Cursor::new(&data);

        assert_eq!(cursor.read_array::<4>("id").unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(cursor.read_len_prefixed("first").unwrap(), &[0xAA, 0xBB]);
        assert_eq!(cursor.read_len_prefixed("second").unwrap(), &[0x03]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_truncated_field_is_named() {
        let mut cursor = Cursor::new(&[0x00, 0x04, 0xAA]);
        match cursor.read_len_prefixed("modulus") {
            Err(Error::TruncatedResponse("modulus")) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_u16_big_endian() {
        let mut cursor = Cursor::new(&[0x01, 0x02]);
        assert_eq!(cursor.read_u16("value").unwrap(), 0x0102);
    }

    #[test]
    fn test_remaining_tracks_position() {
        let mut cursor = Cursor::new(&[1, 2, 3]);
        assert_eq!(cursor.remaining(), 3);
        cursor.read_u8("byte").unwrap();
        assert_eq!(cursor.remaining(), 2);
    }
}
