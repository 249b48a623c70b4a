//! High-level device API for HS1xx smart plugs.
//!
//! [`Device`] wraps a [`CommandSender`] and interprets the JSON responses
//! the transport hands back as opaque text. The seam exists so tests (and
//! alternative transports) can substitute the network exchange.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    commands,
    connector::{self, DEFAULT_PORT, DEFAULT_TIMEOUT},
    error::Error,
    response::{EmeterResponse, PowerConsumption, SetRelayResponse, SysInfo, SysInfoResponse},
};

/// Sends a raw command string to a device at an address.
///
/// Implemented by [`Connector`] over TCP; tests implement it with canned
/// responses.
#[async_trait]
pub trait CommandSender: Send + Sync {
    /// Sends `command` to the device at `address` and returns the raw
    /// response text.
    async fn send(&self, address: &str, command: &str) -> Result<String, Error>;
}

/// [`CommandSender`] backed by one TCP exchange per command.
#[derive(Debug, Clone)]
pub struct Connector {
    port: u16,
    timeout: Duration,
}

impl Connector {
    /// Creates a connector for the standard device port with the default
    /// timeout.
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the TCP port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the connect and I/O timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSender for Connector {
    async fn send(&self, address: &str, command: &str) -> Result<String, Error> {
        connector::send_command(address, self.port, self.timeout, command).await
    }
}

/// A single HS1xx smart plug, addressed by hostname or IP.
///
/// # Example
///
/// ```no_run
/// use hs100_core::device::{Connector, Device};
///
/// #[tokio::main]
/// async fn main() -> Result<(), hs100_core::Error> {
///     let plug = Device::new("192.168.1.100", Connector::new());
///     plug.turn_on().await?;
///     println!("on: {}", plug.is_on().await?);
///     Ok(())
/// }
/// ```
pub struct Device<S: CommandSender> {
    address: String,
    sender: S,
}

impl<S: CommandSender> Device<S> {
    /// Creates a device handle for the given address.
    pub fn new(address: impl Into<String>, sender: S) -> Self {
        Self {
            address: address.into(),
            sender,
        }
    }

    /// The address this device is reached at.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Turns the relay on.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.set_relay(commands::RELAY_ON).await
    }

    /// Turns the relay off.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.set_relay(commands::RELAY_OFF).await
    }

    async fn set_relay(&self, command: &str) -> Result<(), Error> {
        let response = self.sender.send(&self.address, command).await?;
        debug!(address = %self.address, response = %response, "set relay response");

        let parsed: SetRelayResponse = serde_json::from_str(&response)
            .map_err(|e| Error::Parse(format!("set_relay_state response: {}", e)))?;

        let err_code = parsed.system.set_relay_state.err_code;
        if err_code != 0 {
            return Err(Error::Device(format!(
                "set_relay_state returned err_code {}",
                err_code
            )));
        }
        Ok(())
    }

    /// Whether the relay is currently on.
    pub async fn is_on(&self) -> Result<bool, Error> {
        Ok(self.sysinfo().await?.is_on())
    }

    /// The alias/name set on the device.
    pub async fn name(&self) -> Result<String, Error> {
        Ok(self.sysinfo().await?.alias)
    }

    /// Full system information of the device.
    pub async fn sysinfo(&self) -> Result<SysInfo, Error> {
        let response = self.sender.send(&self.address, commands::INFO).await?;
        let parsed: SysInfoResponse = serde_json::from_str(&response)
            .map_err(|e| Error::Parse(format!("get_sysinfo response: {}", e)))?;
        Ok(parsed.system.get_sysinfo)
    }

    /// Current power consumption from the energy meter.
    ///
    /// Devices without a meter (plain HS100) report a non-zero error code,
    /// returned as [`Error::Device`].
    pub async fn power_consumption(&self) -> Result<PowerConsumption, Error> {
        let response = self.sender.send(&self.address, commands::ENERGY).await?;
        let parsed: EmeterResponse = serde_json::from_str(&response)
            .map_err(|e| Error::Parse(format!("emeter response: {}", e)))?;

        let emeter = parsed.emeter;
        if emeter.err_code != 0 {
            return Err(Error::Device(format!(
                "emeter error {}: {}",
                emeter.err_code, emeter.err_msg
            )));
        }

        Ok(emeter.get_realtime.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canned-response sender that records the last command it saw.
    struct FakeSender {
        response: String,
        seen: std::sync::Mutex<Vec<(String, String)>>,
    }

    impl FakeSender {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommandSender for FakeSender {
        async fn send(&self, address: &str, command: &str) -> Result<String, Error> {
            self.seen
                .lock()
                .unwrap()
                .push((address.to_string(), command.to_string()));
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_turn_on_sends_relay_command() {
        let sender = FakeSender::new(r#"{"system":{"set_relay_state":{"err_code":0}}}"#);
        let device = Device::new("192.168.2.100", sender);

        device.turn_on().await.unwrap();

        let seen = device.sender.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("192.168.2.100".to_string(), commands::RELAY_ON.to_string())]
        );
    }

    #[tokio::test]
    async fn test_turn_off_nonzero_err_code_is_device_error() {
        let sender = FakeSender::new(r#"{"system":{"set_relay_state":{"err_code":-3}}}"#);
        let device = Device::new("192.168.2.100", sender);

        let err = device.turn_off().await.unwrap_err();
        assert!(matches!(err, Error::Device(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_is_on_reads_relay_state() {
        let sender =
            FakeSender::new(r#"{"system":{"get_sysinfo":{"alias":"desk","relay_state":1}}}"#);
        let device = Device::new("plug.local", sender);

        assert!(device.is_on().await.unwrap());
    }

    #[tokio::test]
    async fn test_name_reads_alias() {
        let sender =
            FakeSender::new(r#"{"system":{"get_sysinfo":{"alias":"desk","relay_state":0}}}"#);
        let device = Device::new("plug.local", sender);

        assert_eq!(device.name().await.unwrap(), "desk");
    }

    #[tokio::test]
    async fn test_power_consumption() {
        let sender = FakeSender::new(
            r#"{"emeter":{"err_code":0,"get_realtime":{"current":0.21,"voltage":229.5,"power":45.2}}}"#,
        );
        let device = Device::new("plug.local", sender);

        let p = device.power_consumption().await.unwrap();
        assert_eq!(p.power, 45.2);
        assert_eq!(p.voltage, 229.5);
        assert_eq!(p.current, 0.21);
    }

    #[tokio::test]
    async fn test_power_consumption_unsupported_device() {
        let sender =
            FakeSender::new(r#"{"emeter":{"err_code":-1,"err_msg":"module not support"}}"#);
        let device = Device::new("plug.local", sender);

        let err = device.power_consumption().await.unwrap_err();
        assert!(matches!(err, Error::Device(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_garbage_response_is_parse_error() {
        let sender = FakeSender::new("not json at all");
        let device = Device::new("plug.local", sender);

        let err = device.sysinfo().await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }
}
