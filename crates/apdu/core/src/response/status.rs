//! Status words and their semantic interpretation
//!
//! Every response APDU ends in a 16-bit status word. [`StatusWord`] carries
//! the raw bytes; [`Outcome`] is the classified meaning the rest of the
//! stack branches on.

use std::fmt;

/// A 16-bit status word (SW1 SW2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte
    pub sw1: u8,
    /// Second status byte
    pub sw2: u8,
}

impl StatusWord {
    /// Create a status word from its two bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create a status word from a 16-bit value
    pub const fn from_u16(sw: u16) -> Self {
        Self::new((sw >> 8) as u8, (sw & 0xFF) as u8)
    }

    /// The status word as a 16-bit value
    pub const fn to_u16(self) -> u16 {
        ((self.sw1 as u16) << 8) | self.sw2 as u16
    }

    /// Whether this is 0x9000
    pub fn is_success(self) -> bool {
        self == common::SW_NO_ERROR
    }

    /// Classify this status word into a semantic outcome.
    ///
    /// The match order matters: the 0x63Cx arm is a range match and must not
    /// shadow the exact codes, which all lie outside that range.
    pub const fn outcome(self) -> Outcome {
        match self.to_u16() {
            0x9000 => Outcome::Success,
            0x6983 => Outcome::Locked,
            sw if sw & 0xFFF0 == 0x63C0 => Outcome::WrongPin {
                remaining: (sw & 0x000F) as u8,
            },
            0x6982 => Outcome::SecurityNotSatisfied,
            0x6700 => Outcome::WrongLength,
            _ => Outcome::Failure(self),
        }
    }
}

impl fmt::Display for StatusWord {
    /// Four uppercase hex digits, zero-padded
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.sw1, self.sw2)
    }
}

impl From<u16> for StatusWord {
    fn from(sw: u16) -> Self {
        Self::from_u16(sw)
    }
}

impl From<StatusWord> for u16 {
    fn from(sw: StatusWord) -> Self {
        sw.to_u16()
    }
}

/// Semantic classification of a status word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 0x9000
    Success,
    /// 0x6983: the PIN object is blocked
    Locked,
    /// 0x63Cx: wrong PIN, x tries remaining
    WrongPin {
        /// Remaining verification attempts (lowest 4 bits of SW2)
        remaining: u8,
    },
    /// 0x6982: PIN or secure-channel precondition not met
    SecurityNotSatisfied,
    /// 0x6700: wrong length, also the end-of-data signal on chunked reads
    WrongLength,
    /// Any other non-success status word
    Failure(StatusWord),
}

impl Outcome {
    /// Whether this outcome is `Success`
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Common status word constants
pub mod common {
    use super::StatusWord;

    /// Normal completion
    pub const SW_NO_ERROR: StatusWord = StatusWord::new(0x90, 0x00);
    /// Security status not satisfied
    pub const SW_SECURITY_STATUS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x82);
    /// Authentication method blocked
    pub const SW_AUTH_METHOD_BLOCKED: StatusWord = StatusWord::new(0x69, 0x83);
    /// Wrong length
    pub const SW_WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);
    /// Verification failed, remaining tries in the low nibble of SW2
    pub const SW_COUNTER_BASE: StatusWord = StatusWord::new(0x63, 0xC0);
}
