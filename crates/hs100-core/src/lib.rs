//! Client library for TP-Link HS1xx smart plugs.
//!
//! HS1xx devices speak a simple JSON-based protocol over TCP port 9999.
//! Messages are obfuscated with an XOR autokey cipher (initial key 171) and
//! framed with a 4-byte big-endian length header.
//!
//! The crate is layered the way the protocol is:
//!
//! - [`crypto`] — the autokey cipher and frame header
//! - [`connector`] — one dial-send-receive-close exchange per command
//! - [`device`] — typed operations on a single plug (relay, sysinfo, energy)
//! - [`discovery`] — subnet scan for responsive devices
//!
//! # Example
//!
//! ```no_run
//! use hs100_core::{commands, connector::{send_command, DEFAULT_PORT, DEFAULT_TIMEOUT}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hs100_core::Error> {
//!     let response = send_command(
//!         "192.168.1.100",
//!         DEFAULT_PORT,
//!         DEFAULT_TIMEOUT,
//!         commands::INFO,
//!     ).await?;
//!     println!("{}", response);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod connector;
pub mod crypto;
pub mod device;
pub mod discovery;
pub mod error;
pub mod response;

pub use connector::{send_command, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use device::{CommandSender, Connector, Device};
pub use error::Error;

/// The version of the hs100-core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
