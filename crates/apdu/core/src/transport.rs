//! Card transport abstraction
//!
//! A [`CardTransport`] is the narrow seam between the protocol stack and the
//! physical (or simulated) card channel: bytes in, bytes out. Taking
//! `&mut self` for transmission makes exclusive access to the channel a
//! compile-time property, so at most one command is ever in flight.

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Transport over which raw APDUs travel
pub trait CardTransport: fmt::Debug {
    /// Transmit a raw command APDU and return the raw response APDU
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes>;

    /// Whether the transport currently holds an open channel
    fn is_connected(&self) -> bool;

    /// Reset the transport, keeping the channel usable
    fn reset(&mut self) -> Result<()>;
}

/// Handler closure type for scripted mock responses
pub type MockHandler = Box<dyn FnMut(&[u8]) -> Bytes + Send>;

/// A scripted transport for tests
///
/// Responses either come from a fixed queue or from a handler closure that
/// inspects the command (useful for simulating a stateful card). Every
/// transmitted command is recorded.
pub struct MockTransport {
    responses: VecDeque<Bytes>,
    handler: Option<MockHandler>,
    /// Commands transmitted so far, in order
    pub commands: Vec<Bytes>,
    connected: bool,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &self.responses.len())
            .field("commands", &self.commands.len())
            .field("connected", &self.connected)
            .finish()
    }
}

impl MockTransport {
    /// A transport that answers every command with the same response
    pub fn with_response(response: Bytes) -> Self {
        Self::with_responses(vec![response])
    }

    /// A transport that answers commands from a queue, repeating the final
    /// entry once the queue is exhausted
    pub fn with_responses(responses: Vec<Bytes>) -> Self {
        Self {
            responses: responses.into(),
            handler: None,
            commands: Vec::new(),
            connected: true,
        }
    }

    /// A transport driven by a handler closure
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: FnMut(&[u8]) -> Bytes + Send + 'static,
    {
        Self {
            responses: VecDeque::new(),
            handler: Some(Box::new(handler)),
            commands: Vec::new(),
            connected: true,
        }
    }

    /// Mark the transport as disconnected; further transmissions fail
    pub fn disconnect(&mut self) {
        self.connected = false;
    }
}

impl CardTransport for MockTransport {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        if let Some(handler) = &mut self.handler {
            return Ok(handler(command));
        }

        match self.responses.len() {
            0 => Err(Error::Transport("mock response queue empty".to_string())),
            1 => Ok(self.responses[0].clone()),
            _ => Ok(self.responses.pop_front().unwrap()),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<()> {
        self.commands.clear();
        Ok(())
    }
}
