//! Error types for hs100-core.

use thiserror::Error;

/// Error type for hs100-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// TCP connection to the device could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connect, read, or write exceeded the caller-supplied timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// I/O failure mid-exchange: short write, short header, or a payload
    /// truncated before the advertised length was read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The frame header advertised an implausible payload length.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Failed to parse a device response as the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Device answered with a non-zero error code.
    #[error("device error: {0}")]
    Device(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
