//! GET POINTS and UPDATE POINTS commands

use bytes::Bytes;
use tessera_apdu_core::prelude::*;

use crate::Error;
use crate::constants::{CLA_APP, ins};

/// GET POINTS command: reads the card's point balance as a big-endian u16.
#[derive(Debug, Clone)]
pub struct GetPointsCommand;

impl GetPointsCommand {
    /// Build the command; it carries no payload
    pub fn get() -> Self {
        Self
    }
}

impl ApduCommand for GetPointsCommand {
    type Success = u16;
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::GET_POINTS
    }

    fn expected_length(&self) -> Option<u8> {
        Some(2)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        match response.outcome() {
            Outcome::Success => {
                let mut cursor = Cursor::new(response.data());
                Ok(cursor.read_u16("points balance")?)
            }
            Outcome::SecurityNotSatisfied => Err(Error::SecurityPrecondition("PIN required")),
            _ => Err(Error::from_status(response.status())),
        }
    }
}

/// UPDATE POINTS command: writes a new point balance.
/// Payload: the balance as a big-endian u16.
#[derive(Debug, Clone)]
pub struct UpdatePointsCommand {
    data: Bytes,
}

impl UpdatePointsCommand {
    /// Build the payload from the new balance
    pub fn with_points(points: u16) -> Self {
        Self {
            data: Bytes::copy_from_slice(&points.to_be_bytes()),
        }
    }
}

impl ApduCommand for UpdatePointsCommand {
    type Success = ();
    type Error = Error;

    fn convert_error(error: tessera_apdu_core::Error) -> Self::Error {
        error.into()
    }

    fn class(&self) -> u8 {
        CLA_APP
    }

    fn instruction(&self) -> u8 {
        ins::UPDATE_POINTS
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        match response.outcome() {
            Outcome::Success => Ok(()),
            Outcome::SecurityNotSatisfied => Err(Error::SecurityPrecondition("verify PIN first")),
            _ => Err(Error::from_status(response.status())),
        }
    }
}
