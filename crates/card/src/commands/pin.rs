//! PIN commands: verify, change and unblock

use bytes::Bytes;
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, ins};
use crate::credential::PinCredential;

/// Result of a PIN operation, a value callers branch on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinStatus {
    /// Whether the card accepted the operation
    pub verified: bool,
    /// Human-readable summary
    pub message: String,
    /// Remaining tries after a wrong PIN, when the card reported them
    pub remaining_tries: Option<u8>,
    /// Raw status word the card answered with
    pub status: StatusWord,
}

impl PinStatus {
    /// Build a `PinStatus` from a response.
    ///
    /// Wrong-PIN and locked outcomes are results, not errors: the caller
    /// inspects `verified`. Anything else becomes a typed error.
    fn from_response(
        response: &Response,
        ok_message: &str,
        wrong_pin_message: &str,
    ) -> Result<Self, Error> {
        let status = response.status();
        match response.outcome() {
            Outcome::Success => Ok(Self {
                verified: true,
                message: ok_message.to_string(),
                remaining_tries: None,
                status,
            }),
            Outcome::WrongPin { remaining } => Ok(Self {
                verified: false,
                message: wrong_pin_message.to_string(),
                remaining_tries: Some(remaining),
                status,
            }),
            Outcome::Locked => Ok(Self {
                verified: false,
                message: "PIN locked".to_string(),
                remaining_tries: None,
                status,
            }),
            _ => Err(Error::from_status(status)),
        }
    }
}

/// VERIFY PIN command
#[derive(Debug, Clone)]
pub struct VerifyPinCommand {
    data: Bytes,
}

impl VerifyPinCommand {
    /// Payload: the raw PIN bytes, no length prefix
    pub fn with_pin(pin: &PinCredential) -> Self {
        Self {
            data: Bytes::copy_from_slice(pin.as_bytes()),
        }
    }
}

impl ApduCommand for VerifyPinCommand {
    type Success = PinStatus;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::VERIFY_PIN
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        PinStatus::from_response(&response, "PIN verified", "wrong PIN")
    }
}

/// CHANGE PIN command
#[derive(Debug, Clone)]
pub struct ChangePinCommand {
    data: Bytes,
}

impl ChangePinCommand {
    /// Payload: `[oldLen:1][old][newLen:1][new]`
    pub fn with_pins(old: &PinCredential, new: &PinCredential) -> Self {
        let mut payload = old.prefixed();
        payload.extend_from_slice(&new.prefixed());
        Self {
            data: payload.into(),
        }
    }
}

impl ApduCommand for ChangePinCommand {
    type Success = PinStatus;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::CHANGE_PIN
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        PinStatus::from_response(&response, "PIN changed", "old PIN incorrect")
    }
}

/// UNBLOCK PIN command, resetting the PIN to the card's default
#[derive(Debug, Clone, Copy)]
pub struct UnblockPinCommand;

impl UnblockPinCommand {
    /// No payload
    pub const fn reset() -> Self {
        Self
    }
}

impl ApduCommand for UnblockPinCommand {
    type Success = PinStatus;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::UNBLOCK_PIN
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        PinStatus::from_response(&response, "PIN reset to default", "unblock refused")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PIN;

    #[test]
    fn test_verify_payload_is_raw_pin() {
        let cmd = VerifyPinCommand::with_pin(&PinCredential::new("1234"));
        assert_eq!(cmd.data().unwrap(), b"1234");
    }

    #[test]
    fn test_verify_wrong_pin_remaining_tries() {
        let response = Response::from_bytes(&[0x63, 0xC2]).unwrap();
        let status = VerifyPinCommand::parse_response(response).unwrap();
        assert!(!status.verified);
        assert_eq!(status.remaining_tries, Some(2));
        assert_eq!(status.status.to_u16(), 0x63C2);
    }

    #[test]
    fn test_verify_success() {
        let response = Response::from_bytes(&[0x90, 0x00]).unwrap();
        let status = VerifyPinCommand::parse_response(response).unwrap();
        assert!(status.verified);
        assert_eq!(status.remaining_tries, None);
    }

    #[test]
    fn test_verify_locked() {
        let response = Response::from_bytes(&[0x69, 0x83]).unwrap();
        let status = VerifyPinCommand::parse_response(response).unwrap();
        assert!(!status.verified);
        assert_eq!(status.message, "PIN locked");
    }

    #[test]
    fn test_change_pin_payload_layout() {
        let old = PinCredential::new("1234");
        let new = PinCredential::new("98765");
        let cmd = ChangePinCommand::with_pins(&old, &new);
        assert_eq!(
            cmd.data().unwrap(),
            &[0x04, b'1', b'2', b'3', b'4', 0x05, b'9', b'8', b'7', b'6', b'5']
        );
    }

    #[test]
    fn test_change_pin_wrong_old_pin_message() {
        let response = Response::from_bytes(&[0x63, 0xC1]).unwrap();
        let status = ChangePinCommand::parse_response(response).unwrap();
        assert!(!status.verified);
        assert_eq!(status.message, "old PIN incorrect");
        assert_eq!(status.remaining_tries, Some(1));
    }

    #[test]
    fn test_unblock_has_empty_payload() {
        let cmd = UnblockPinCommand::reset();
        assert!(cmd.data().is_none());
        assert_eq!(cmd.instruction(), 0x22);
    }

    #[test]
    fn test_default_pin_verifies_after_unblock() {
        // Unblock resets the card-side PIN to the default, so the next
        // verify presents exactly that value
        let response = Response::from_bytes(&[0x90, 0x00]).unwrap();
        let status = UnblockPinCommand::parse_response(response).unwrap();
        assert!(status.verified);
        assert_eq!(status.message, "PIN reset to default");

        let cmd = VerifyPinCommand::with_pin(&PinCredential::new(DEFAULT_PIN));
        assert_eq!(cmd.data().unwrap(), DEFAULT_PIN.as_bytes());
    }
}
