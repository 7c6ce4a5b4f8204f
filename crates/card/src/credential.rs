//! PIN credential handling
//!
//! The PIN travels verbatim inside PIN-gated command payloads and is never
//! stored beyond the call that uses it; the buffer is wiped on drop.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A PIN held only for the duration of the command that uses it
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PinCredential(Vec<u8>);

impl PinCredential {
    /// Wrap a PIN string
    pub fn new(pin: &str) -> Self {
        Self(pin.as_bytes().to_vec())
    }

    /// PIN length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the PIN is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw PIN bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The `[len:1][pin]` header prefixed to PIN-gated payloads
    pub fn prefixed(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(1 + self.0.len());
        buffer.push(self.0.len() as u8);
        buffer.extend_from_slice(&self.0);
        buffer
    }

    /// Payload bytes the header occupies: the length byte plus the PIN
    pub fn overhead(&self) -> usize {
        1 + self.0.len()
    }
}

impl fmt::Debug for PinCredential {
    // Never print the digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinCredential({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_layout() {
        let pin = PinCredential::new("1234");
        assert_eq!(pin.prefixed(), vec![0x04, b'1', b'2', b'3', b'4']);
        assert_eq!(pin.overhead(), 5);
    }

    #[test]
    fn test_debug_hides_digits() {
        let pin = PinCredential::new("9876");
        assert_eq!(format!("{pin:?}"), "PinCredential(4 bytes)");
    }
}
