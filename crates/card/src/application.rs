//! The synchronous application facade front ends call into
//!
//! [`Tessera`] wraps a [`Session`] and exposes one method per applet
//! operation, translating between front-end types (strings, byte slices)
//! and the typed commands underneath.

use tracing::{debug, warn};

use tessera_apdu_core::prelude::*;
use tessera_apdu_transport_pcsc::{PcscDeviceManager, PcscTransport};

use crate::commands::{
    CardId, ChangePinCommand, GetCardIdCommand, GetInfoCommand, GetPointsCommand, PinStatus,
    RegisterCommand, RegistrationRecord, SignChallengeCommand, UnblockPinCommand,
    UpdateInfoCommand, UpdatePointsCommand, VerifyPinCommand,
};
use crate::constants::{VIRTUAL_READER_MARKERS, ins};
use crate::credential::PinCredential;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::transfer;

/// Whether a PC/SC reader name identifies the virtual development reader
pub fn is_virtual_reader(name: &str) -> bool {
    VIRTUAL_READER_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Client for one card over one transport
#[derive(Debug)]
pub struct Tessera<T: CardTransport> {
    session: Session<T>,
}

impl<T: CardTransport> Default for Tessera<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CardTransport> Tessera<T> {
    /// Create a client with no card attached
    pub const fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Create a client over an already-open transport and select the applet
    pub fn with_transport(transport: T) -> Result<Self> {
        let mut client = Self::new();
        client.session.attach(transport);
        if !client.session.select_applet() {
            return Err(Error::AppletSelectionFailed);
        }
        Ok(client)
    }

    /// Borrow the underlying session
    pub const fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Whether a transport is attached
    pub const fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Drop the transport, closing the channel
    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    /// Send a hand-written APDU given as hex and return the response as hex.
    ///
    /// Whitespace in the input is ignored. The returned string is the
    /// response data (uppercase hex) followed by the four status word
    /// digits.
    pub fn exchange_raw(&mut self, hex_command: &str) -> Result<String> {
        let compact: String = hex_command.split_whitespace().collect();
        let command = hex::decode(&compact)
            .map_err(|_| Error::InvalidInput("malformed hex command".to_string()))?;

        let response_bytes = self.session.transmit_raw(&command).map_err(Error::from)?;
        let response = Response::from_bytes(&response_bytes).map_err(Error::from)?;

        Ok(format!(
            "{}{}",
            hex::encode_upper(response.data()),
            response.status()
        ))
    }

    fn credential(pin: &str) -> Result<PinCredential> {
        if pin.is_empty() {
            return Err(Error::InvalidInput("PIN must not be empty".to_string()));
        }
        if pin.len() > 255 {
            return Err(Error::InvalidInput("PIN too long".to_string()));
        }
        Ok(PinCredential::new(pin))
    }

    /// Enroll the holder; the card generates and returns its RSA identity
    pub fn register(&mut self, pin: &str) -> Result<RegistrationRecord> {
        let pin = Self::credential(pin)?;
        let record = self.session.execute(&RegisterCommand::with_pin(&pin))?;
        debug!(card_id = %record.card_id_hex(), "card registered");
        Ok(record)
    }

    /// Present the holder PIN for verification
    pub fn verify_pin(&mut self, pin: &str) -> Result<PinStatus> {
        let pin = Self::credential(pin)?;
        self.session.execute(&VerifyPinCommand::with_pin(&pin))
    }

    /// Change the holder PIN
    pub fn change_pin(&mut self, old: &str, new: &str) -> Result<PinStatus> {
        let old = Self::credential(old)?;
        let new = Self::credential(new)?;
        self.session.execute(&ChangePinCommand::with_pins(&old, &new))
    }

    /// Unblock a locked PIN, resetting it to the card default
    pub fn unblock_pin(&mut self) -> Result<PinStatus> {
        self.session.execute(&UnblockPinCommand::reset())
    }

    /// Read the card identifier and blocked flag
    pub fn card_id(&mut self) -> Result<CardId> {
        self.session.execute(&GetCardIdCommand::get())
    }

    /// Have the card sign a challenge with its private key
    pub fn sign_challenge(&mut self, challenge: &[u8]) -> Result<Bytes> {
        if challenge.is_empty() {
            return Err(Error::InvalidInput("empty challenge".to_string()));
        }
        self.session
            .execute(&SignChallengeCommand::with_challenge(challenge))
    }

    /// Replace the personal info record
    pub fn update_user_info(&mut self, pin: &str, text: &str) -> Result<()> {
        let pin = Self::credential(pin)?;
        self.session
            .execute(&UpdateInfoCommand::with_text(&pin, text))
    }

    /// Read the personal info record and the points balance together.
    ///
    /// Returns `"<info>|<points>"`, the combined display form front ends
    /// show after a successful PIN entry.
    pub fn secure_info(&mut self, pin: &str) -> Result<String> {
        let pin = Self::credential(pin)?;
        let text = self.session.execute(&GetInfoCommand::with_pin(&pin))?;
        let points = self.session.execute(&GetPointsCommand::get())?;
        Ok(format!("{text}|{points}"))
    }

    /// Read the points balance
    pub fn points(&mut self) -> Result<u16> {
        self.session.execute(&GetPointsCommand::get())
    }

    /// Replace the points balance
    pub fn update_points(&mut self, points: u16) -> Result<()> {
        self.session
            .execute(&UpdatePointsCommand::with_points(points))
    }

    /// Upload an image to the card in chunks, returning the bytes written.
    ///
    /// With a PIN, every chunk carries the PIN header. Input beyond the
    /// card's capacity is truncated.
    pub fn upload_image(&mut self, image: &[u8], pin: Option<&str>) -> Result<usize> {
        let pin = pin.map(Self::credential).transpose()?;
        transfer::upload(&mut self.session, ins::WRITE_IMAGE, image, pin.as_ref())
    }

    /// Download the stored image from the card in chunks
    pub fn read_image(&mut self, pin: &str) -> Result<Vec<u8>> {
        let pin = Self::credential(pin)?;
        transfer::download(&mut self.session, ins::READ_IMAGE, &pin)
    }
}

impl Tessera<PcscTransport> {
    /// Attach to the first virtual development reader holding a card and
    /// select the applet. Returns `false` when no usable reader is found.
    pub fn connect(&mut self) -> bool {
        let manager = match PcscDeviceManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                warn!(error = %e, "PC/SC unavailable");
                return false;
            }
        };

        let readers = match manager.list_readers() {
            Ok(readers) => readers,
            Err(e) => {
                warn!(error = %e, "reader enumeration failed");
                return false;
            }
        };

        for reader in readers.iter().filter(|r| is_virtual_reader(r.name())) {
            if !reader.has_card() {
                debug!(reader = reader.name(), "no card present, skipping");
                continue;
            }

            let transport = match manager.open_reader(reader.name()) {
                Ok(transport) => transport,
                Err(e) => {
                    warn!(reader = reader.name(), error = %e, "open failed, skipping");
                    continue;
                }
            };

            self.session.attach(transport);
            if self.session.select_applet() {
                debug!(reader = reader.name(), "connected");
                return true;
            }
            self.session.disconnect();
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_apdu_core::transport::MockTransport;

    const OK: &[u8] = &[0x90, 0x00];

    fn client_with_responses(mut responses: Vec<Bytes>) -> Tessera<MockTransport> {
        // First response answers SELECT
        responses.insert(0, Bytes::from_static(OK));
        Tessera::with_transport(MockTransport::with_responses(responses)).unwrap()
    }

    #[test]
    fn test_is_virtual_reader() {
        assert!(is_virtual_reader("JAVACOS Reader 0"));
        assert!(is_virtual_reader("Some Virtual Reader"));
        assert!(!is_virtual_reader("Gemalto PC Twin Reader"));
    }

    #[test]
    fn test_with_transport_selection_refused() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x6A, 0x82]));
        assert!(matches!(
            Tessera::with_transport(transport),
            Err(Error::AppletSelectionFailed)
        ));
    }

    #[test]
    fn test_exchange_raw_formats_response() {
        let mut client = client_with_responses(vec![Bytes::from_static(&[0xDE, 0xAD, 0x90, 0x00])]);
        let reply = client.exchange_raw("A0 32 00 00").unwrap();
        assert_eq!(reply, "DEAD9000");

        let sent = &client.session().transport().unwrap().commands[1];
        assert_eq!(sent.as_ref(), &[0xA0, 0x32, 0x00, 0x00]);
    }

    #[test]
    fn test_exchange_raw_rejects_bad_hex() {
        let mut client = client_with_responses(vec![]);
        assert!(matches!(
            client.exchange_raw("zz"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_disconnected_client_errors() {
        let mut client: Tessera<MockTransport> = Tessera::new();
        assert!(!client.is_connected());
        assert!(matches!(
            client.verify_pin("1234"),
            Err(Error::Apdu(tessera_apdu_core::Error::NotConnected))
        ));
    }

    #[test]
    fn test_empty_pin_rejected() {
        let mut client = client_with_responses(vec![]);
        assert!(matches!(
            client.verify_pin(""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_secure_info_joins_record_and_points() {
        let mut info = b"alice".to_vec();
        info.extend_from_slice(&[0u8; 11]);
        info.extend_from_slice(OK);
        let mut client = client_with_responses(vec![
            Bytes::from(info),
            Bytes::from_static(&[0x01, 0x2C, 0x90, 0x00]),
        ]);
        assert_eq!(client.secure_info("1234").unwrap(), "alice|300");
    }

    #[test]
    fn test_verify_pin_surfaces_remaining_tries() {
        let mut client = client_with_responses(vec![Bytes::from_static(&[0x63, 0xC1])]);
        let status = client.verify_pin("0000").unwrap();
        assert!(!status.verified);
        assert_eq!(status.remaining_tries, Some(1));
    }

    #[test]
    fn test_register_flow() {
        let mut record = hex::decode("01020304050607080002AABB000103").unwrap();
        record.extend_from_slice(OK);
        let mut client = client_with_responses(vec![Bytes::from(record)]);
        let record = client.register("1234").unwrap();
        assert_eq!(record.card_id_hex(), "0102030405060708");
    }

    #[test]
    fn test_sign_rejects_empty_challenge() {
        let mut client = client_with_responses(vec![]);
        assert!(matches!(
            client.sign_challenge(&[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_image_round_trip_via_facade() {
        let mut client = client_with_responses(vec![Bytes::from_static(OK)]);
        let written = client.upload_image(&[0x42; 100], None).unwrap();
        assert_eq!(written, 100);

        let commands = &client.session().transport().unwrap().commands;
        // SELECT plus one write chunk
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1][1], ins::WRITE_IMAGE);
    }
}
