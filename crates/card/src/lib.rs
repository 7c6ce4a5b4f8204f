//! Host-side client for the Tessera card applet
//!
//! The applet stores a PIN-protected user record, a loyalty points counter,
//! an RSA identity and a small image. This crate drives it over any
//! [`CardTransport`](tessera_apdu_core::CardTransport):
//!
//! - [`Session`] owns the transport and enforces the connection lifecycle
//! - [`commands`] holds one typed command per applet operation
//! - [`transfer`] moves buffers larger than one APDU in offset-addressed
//!   chunks
//! - [`Tessera`] is the synchronous facade front ends call into
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod application;
pub mod commands;
mod constants;
mod credential;
mod error;
mod session;
pub mod transfer;

pub use application::{Tessera, is_virtual_reader};
pub use commands::*;
pub use constants::*;
pub use credential::PinCredential;
pub use error::{Error, Result};
pub use session::{Session, SessionState};

pub use tessera_apdu_core::{Outcome, StatusWord};
