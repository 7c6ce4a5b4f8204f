//! GET CARD ID command

use std::fmt;

use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, ins};

/// GET CARD ID command
#[derive(Debug, Clone, Copy)]
pub struct GetCardIdCommand;

impl GetCardIdCommand {
    /// Expects `[cardId:8][status:1]` back
    pub const fn get() -> Self {
        Self
    }
}

/// The card identifier with the on-card blocked flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardId {
    /// Fixed 8-byte identifier
    pub id: [u8; 8],
    /// Whether the card reports itself blocked (status byte 0x01)
    pub blocked: bool,
}

impl fmt::Display for CardId {
    /// Uppercase hex id, with a `.BLOCKED` marker appended when blocked
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.id))?;
        if self.blocked {
            write!(f, ".BLOCKED")?;
        }
        Ok(())
    }
}

impl ApduCommand for GetCardIdCommand {
    type Success = CardId;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::GET_CARD_ID
    }

    fn expected_length(&self) -> Option<u8> {
        Some(9)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        if !response.is_success() {
            return Err(Error::from_status(response.status()));
        }

        let mut cursor = Cursor::new(response.data());
        let id = cursor.read_array::<8>("card id")?;
        let status = cursor.read_u8("blocked flag")?;

        Ok(CardId {
            id,
            blocked: status == 0x01,
        })
    }
}
