//! Session lifecycle over a card transport
//!
//! A [`Session`] owns the transport exclusively and is the single point
//! every command passes through. Dispatch takes `&mut self`, so at most one
//! command is in flight against the shared channel at any time.

use tessera_apdu_core::prelude::*;
use tessera_apdu_core::{Error as ApduError, Result as ApduResult};
use tracing::{debug, trace, warn};

use crate::constants::APPLET_AID;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport attached
    Disconnected,
    /// Transport attached, applet not yet selected
    Connected,
    /// Applet selected; operations may be dispatched
    AppletSelected,
}

/// A session with one card over one transport
#[derive(Debug)]
pub struct Session<T: CardTransport> {
    state: SessionState,
    transport: Option<T>,
}

impl<T: CardTransport> Default for Session<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CardTransport> Session<T> {
    /// Create a disconnected session
    pub const fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
            transport: None,
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a transport is attached
    pub const fn is_connected(&self) -> bool {
        !matches!(self.state, SessionState::Disconnected)
    }

    /// Borrow the attached transport, if any
    pub const fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Attach an open transport; the session becomes `Connected`
    pub fn attach(&mut self, transport: T) {
        self.transport = Some(transport);
        self.state = SessionState::Connected;
    }

    /// Issue SELECT for the applet.
    ///
    /// Returns `true` and moves to `AppletSelected` iff the card answers
    /// 0x9000. Returns `false` immediately when no transport is attached.
    pub fn select_applet(&mut self) -> bool {
        if self.transport.is_none() {
            return false;
        }

        let cmd = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, APPLET_AID.as_slice());
        match self.transmit(&cmd) {
            Ok(response) if response.is_success() => {
                debug!("applet selected");
                self.state = SessionState::AppletSelected;
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "applet selection refused");
                false
            }
            Err(e) => {
                warn!(error = %e, "applet selection failed");
                false
            }
        }
    }

    /// Tear the session down.
    ///
    /// Dropping the transport closes the underlying channel; close failures
    /// never propagate to the caller.
    pub fn disconnect(&mut self) {
        self.transport = None;
        self.state = SessionState::Disconnected;
        debug!("session disconnected");
    }

    /// Dispatch one command and parse the response envelope.
    ///
    /// A transmit failure leaves the session state untouched: the caller
    /// decides whether to reconnect.
    pub fn transmit(&mut self, command: &Command) -> ApduResult<Response> {
        let transport = self.transport.as_mut().ok_or(ApduError::NotConnected)?;
        command.validate()?;

        trace!(cla = command.cla, ins = command.ins, "dispatching command");
        let response_bytes = transport.transmit_raw(&command.to_bytes())?;
        Response::from_bytes(&response_bytes)
    }

    /// Dispatch a typed command and decode its result
    pub fn execute<C: ApduCommand>(&mut self, command: &C) -> Result<C::Success, C::Error> {
        let response = self
            .transmit(&command.to_command())
            .map_err(C::convert_error)?;
        C::parse_response(response)
    }

    /// Pass pre-built command bytes straight through to the transport
    pub fn transmit_raw(&mut self, command: &[u8]) -> ApduResult<Bytes> {
        let transport = self.transport.as_mut().ok_or(ApduError::NotConnected)?;
        transport.transmit_raw(command)
    }
}
