//! SIGN CHALLENGE command

use bytes::Bytes;
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, ins};

/// SIGN CHALLENGE command: the card signs a host-supplied challenge with
/// its private key. Requires a verified PIN.
#[derive(Debug, Clone)]
pub struct SignChallengeCommand {
    data: Bytes,
}

impl SignChallengeCommand {
    /// Payload: the raw challenge bytes
    pub fn with_challenge(challenge: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(challenge),
        }
    }
}

impl ApduCommand for SignChallengeCommand {
    type Success = Bytes;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::SIGN_CHALLENGE
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        match response.outcome() {
            Outcome::Success => Ok(response.payload().cloned().unwrap_or_default()),
            Outcome::SecurityNotSatisfied => Err(Error::SecurityPrecondition("PIN required")),
            _ => Err(Error::from_status(response.status())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_returned() {
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE];
        bytes.extend_from_slice(&[0x90, 0x00]);
        let signature =
            SignChallengeCommand::parse_response(Response::from_bytes(&bytes).unwrap()).unwrap();
        assert_eq!(signature.as_ref(), &[0xCA, 0xFE, 0xBA, 0xBE]);
    }

    #[test]
    fn test_pin_required() {
        let response = Response::from_bytes(&[0x69, 0x82]).unwrap();
        assert!(matches!(
            SignChallengeCommand::parse_response(response),
            Err(Error::SecurityPrecondition("PIN required"))
        ));
    }
}
