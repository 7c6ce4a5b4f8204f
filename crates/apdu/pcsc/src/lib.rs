//! PC/SC transport for APDU operations
//!
//! Thin wrapper around the system PC/SC stack: a [`PcscDeviceManager`] owns
//! the service context and enumerates readers, and [`PcscTransport`]
//! implements the core [`CardTransport`](tessera_apdu_core::CardTransport)
//! over an open card handle.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod reader;
mod transport;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use reader::PcscReader;
pub use transport::{PcscDeviceManager, PcscTransport};
