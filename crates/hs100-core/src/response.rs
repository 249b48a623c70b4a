//! Typed response structures for HS1xx device JSON responses.
//!
//! The transport returns raw response text; these structures give the
//! device API and CLI a typed view of the common response shapes.

use serde::{Deserialize, Serialize};

/// Response wrapper for [`commands::INFO`](crate::commands::INFO).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SysInfoResponse {
    pub system: SystemWrapper,
}

/// Wrapper for the `get_sysinfo` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemWrapper {
    pub get_sysinfo: SysInfo,
}

/// Device system information.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SysInfo {
    /// Device alias/name set by the user.
    #[serde(default)]
    pub alias: String,

    /// Device model (e.g., "HS100(EU)", "HS110(EU)").
    #[serde(default)]
    pub model: String,

    /// MAC address of the device.
    #[serde(default)]
    pub mac: String,

    /// Unique device ID.
    #[serde(default, rename = "deviceId")]
    pub device_id: String,

    /// Hardware ID.
    #[serde(default, rename = "hwId")]
    pub hw_id: String,

    /// OEM ID.
    #[serde(default, rename = "oemId")]
    pub oem_id: String,

    /// Hardware version.
    #[serde(default)]
    pub hw_ver: String,

    /// Software/firmware version.
    #[serde(default)]
    pub sw_ver: String,

    /// Current relay state (1 = on, 0 = off).
    #[serde(default)]
    pub relay_state: u8,
}

impl SysInfo {
    /// Whether the relay is currently on.
    pub fn is_on(&self) -> bool {
        self.relay_state == 1
    }
}

/// Response wrapper for `set_relay_state` commands.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRelayResponse {
    pub system: SetRelayWrapper,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetRelayWrapper {
    pub set_relay_state: SetRelayState,
}

/// Result of a relay switch, carrying only the device error code.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRelayState {
    #[serde(default)]
    pub err_code: i32,
}

/// Response wrapper for [`commands::ENERGY`](crate::commands::ENERGY).
#[derive(Debug, Clone, Deserialize)]
pub struct EmeterResponse {
    pub emeter: Emeter,
}

/// The `emeter` object of an energy response.
///
/// Devices without an energy meter answer with a non-zero `err_code` and an
/// `err_msg` instead of readings.
#[derive(Debug, Clone, Deserialize)]
pub struct Emeter {
    #[serde(default)]
    pub err_code: i32,

    #[serde(default)]
    pub err_msg: String,

    #[serde(default)]
    pub get_realtime: Realtime,
}

/// Real-time readings from the energy meter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Realtime {
    #[serde(default)]
    pub current: f32,

    #[serde(default)]
    pub voltage: f32,

    #[serde(default)]
    pub power: f32,
}

/// Current power consumption of a device, in amps, volts, and watts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerConsumption {
    pub current: f32,
    pub voltage: f32,
    pub power: f32,
}

impl From<Realtime> for PowerConsumption {
    fn from(rt: Realtime) -> Self {
        Self {
            current: rt.current,
            voltage: rt.voltage,
            power: rt.power,
        }
    }
}
