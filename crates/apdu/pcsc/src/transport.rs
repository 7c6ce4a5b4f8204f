//! PC/SC device manager and card transport

use std::ffi::CString;
use std::fmt;
use std::time::Duration;

use pcsc::{Card, Context, Disposition, ReaderState, Scope, State};
use tracing::{debug, trace, warn};

use tessera_apdu_core::{Bytes, CardTransport, Error};

use crate::{PcscConfig, PcscError, PcscReader};

/// Manager for PC/SC devices, owning the service context
pub struct PcscDeviceManager {
    context: Context,
}

impl fmt::Debug for PcscDeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscDeviceManager").finish_non_exhaustive()
    }
}

impl PcscDeviceManager {
    /// Establish a new PC/SC context
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List attached readers with a snapshot of their card state
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let mut buffer = vec![0u8; self.context.list_readers_len()?];
        let names: Vec<CString> = self
            .context
            .list_readers(&mut buffer)?
            .map(CString::from)
            .collect();

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut states: Vec<ReaderState> = names
            .iter()
            .map(|name| ReaderState::new(name.clone(), State::UNAWARE))
            .collect();

        // Zero timeout: we only want the current state, not to wait for events
        self.context
            .get_status_change(Duration::ZERO, &mut states)?;

        let readers = states.iter().map(PcscReader::from_reader_state).collect();
        Ok(readers)
    }

    /// Open a transport to the named reader with the default configuration
    pub fn open_reader(&self, name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(name, PcscConfig::default())
    }

    /// Open a transport to the named reader
    pub fn open_reader_with_config(
        &self,
        name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        let c_name = CString::new(name).map_err(|_| PcscError::InvalidReaderName)?;

        let card = self
            .context
            .connect(&c_name, config.share_mode.into(), config.protocols)
            .map_err(|e| match e {
                pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard => {
                    PcscError::NoCard(name.to_string())
                }
                pcsc::Error::UnknownReader => PcscError::ReaderNotFound(name.to_string()),
                other => PcscError::Pcsc(other),
            })?;

        debug!(reader = name, "opened card channel");
        Ok(PcscTransport { card, config })
    }
}

/// PC/SC implementation of [`CardTransport`]
pub struct PcscTransport {
    card: Card,
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CardTransport for PcscTransport {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        trace!(len = command.len(), "transmitting APDU");

        let mut receive_buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        let response = self
            .card
            .transmit(command, &mut receive_buffer)
            .map_err(|e| {
                warn!(error = %e, "PC/SC transmit failed");
                Error::transport(e)
            })?;

        Ok(Bytes::copy_from_slice(response))
    }

    fn is_connected(&self) -> bool {
        // Holding a Card means the logical channel is open; removal surfaces
        // as a transmit error.
        true
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.card
            .reconnect(
                self.config.share_mode.into(),
                self.config.protocols,
                Disposition::ResetCard,
            )
            .map_err(Error::transport)
    }
}
