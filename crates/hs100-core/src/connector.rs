//! TCP connector for the HS1xx smart plug protocol.
//!
//! One call to [`send_command`] is one full exchange: dial, write the
//! ciphered frame, read the framed response, close. No connection is ever
//! reused, and no state survives between calls, so concurrent exchanges
//! against the same or different devices need no coordination.

use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::debug;

use crate::{
    crypto::{decrypt, encrypt_with_header},
    error::Error,
};

/// Default TCP port for the HS1xx smart plug protocol.
///
/// All devices of this family listen on port 9999.
pub const DEFAULT_PORT: u16 = 9999;

/// Default connect and I/O timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on an advertised response payload. Real responses are small
/// JSON documents; anything bigger is a corrupt or hostile header.
const MAX_PAYLOAD: usize = 1024 * 1024;

/// Sends a command to an HS1xx device and returns the deciphered response.
///
/// The command is treated as opaque text: it is ciphered, framed with a
/// 4-byte big-endian length header, and written to the device; the response
/// frame is read back, deciphered, and returned without any JSON
/// interpretation. Interpreting the response belongs to callers such as
/// [`Device`](crate::device::Device).
///
/// # Arguments
///
/// * `target` - Hostname or IP address of the device
/// * `port` - TCP port (typically [`DEFAULT_PORT`])
/// * `command_timeout` - Bound on connect and on each read/write
/// * `command` - Command string to send (JSON in practice)
///
/// # Errors
///
/// * [`Error::ConnectionFailed`] / [`Error::Timeout`] when the connection
///   cannot be established within the timeout
/// * [`Error::Io`] on a short write, short header, or truncated payload;
///   a partial response is never returned
/// * [`Error::Protocol`] when the header advertises an oversize payload
///
/// The connection is closed on every exit path, success or failure.
///
/// # Example
///
/// ```no_run
/// use hs100_core::{commands, connector::{send_command, DEFAULT_PORT, DEFAULT_TIMEOUT}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), hs100_core::Error> {
///     let response = send_command(
///         "192.168.1.100",
///         DEFAULT_PORT,
///         DEFAULT_TIMEOUT,
///         commands::INFO,
///     ).await?;
///     println!("{}", response);
///     Ok(())
/// }
/// ```
pub async fn send_command(
    target: &str,
    port: u16,
    command_timeout: Duration,
    command: &str,
) -> Result<String, Error> {
    let addr = format!("{}:{}", target, port);
    debug!(addr = %addr, "connecting");

    let mut stream = timeout(command_timeout, TcpStream::connect(&addr))
        .await
        .map_err(|_| Error::Timeout(format!("connect to {} timed out", addr)))?
        .map_err(|e| Error::ConnectionFailed(format!("connect to {}: {}", addr, e)))?;

    let frame = encrypt_with_header(command.as_bytes());
    debug!(addr = %addr, bytes = frame.len(), "sending request");

    timeout(command_timeout, stream.write_all(&frame))
        .await
        .map_err(|_| Error::Timeout(format!("write to {} timed out", addr)))?
        .map_err(|e| Error::Io(format!("write to {}: {}", addr, e)))?;

    // The response header is exactly 4 bytes; fewer means the stream ended
    // early and read_exact reports it as an error.
    let mut header = [0u8; 4];
    timeout(command_timeout, stream.read_exact(&mut header))
        .await
        .map_err(|_| Error::Timeout(format!("read header from {} timed out", addr)))?
        .map_err(|e| Error::Io(format!("read header from {}: {}", addr, e)))?;

    let payload_len = u32::from_be_bytes(header) as usize;
    debug!(addr = %addr, payload_bytes = payload_len, "response header");

    if payload_len > MAX_PAYLOAD {
        return Err(Error::Protocol(format!(
            "response from {} too large: {} bytes",
            addr, payload_len
        )));
    }

    // read_exact loops until the full advertised length is collected or the
    // connection closes, so a truncated payload can never leak out as a
    // short response string.
    let mut payload = vec![0u8; payload_len];
    timeout(command_timeout, stream.read_exact(&mut payload))
        .await
        .map_err(|_| Error::Timeout(format!("read payload from {} timed out", addr)))?
        .map_err(|e| Error::Io(format!("read payload from {}: {}", addr, e)))?;

    debug!(addr = %addr, bytes = payload_len, "received response");

    let plaintext = decrypt(&payload);
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}
