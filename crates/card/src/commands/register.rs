//! REGISTER command: enrolls the holder and returns the on-card RSA identity

use bytes::Bytes;
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, ins};
use crate::credential::PinCredential;

/// REGISTER command
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    data: Bytes,
}

impl RegisterCommand {
    /// Payload: `[pinLen:1][pin]`
    pub fn with_pin(pin: &PinCredential) -> Self {
        Self {
            data: pin.prefixed().into(),
        }
    }
}

/// The identity the card generates on registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// Fixed 8-byte card identifier
    pub card_id: [u8; 8],
    /// RSA public modulus
    pub modulus: Bytes,
    /// RSA public exponent
    pub exponent: Bytes,
}

impl RegistrationRecord {
    /// Card identifier as uppercase hex
    pub fn card_id_hex(&self) -> String {
        hex::encode_upper(self.card_id)
    }
}

impl ApduCommand for RegisterCommand {
    type Success = RegistrationRecord;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::REGISTER
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    /// Response: `[cardId:8][modLen:2][modulus][expLen:2][exponent]`
    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        if !response.is_success() {
            return Err(Error::from_status(response.status()));
        }

        let mut cursor = Cursor::new(response.data());
        let card_id = cursor.read_array::<8>("card id")?;
        let modulus = Bytes::copy_from_slice(cursor.read_len_prefixed("modulus")?);
        let exponent = Bytes::copy_from_slice(cursor.read_len_prefixed("exponent")?);

        Ok(RegistrationRecord {
            card_id,
            modulus,
            exponent,
        })
    }
}
