//! Predefined JSON command strings for HS1xx device operations.
//!
//! These constants can be passed directly to
//! [`send_command`](crate::connector::send_command) without constructing
//! JSON manually.

/// Get system information.
///
/// Returns device model, alias, MAC address, firmware version, relay state,
/// and more.
pub const INFO: &str = r#"{"system":{"get_sysinfo":{}}}"#;

/// Turn on the relay (power on the connected appliance).
pub const RELAY_ON: &str = r#"{"system":{"set_relay_state":{"state":1}}}"#;

/// Turn off the relay (power off the connected appliance).
pub const RELAY_OFF: &str = r#"{"system":{"set_relay_state":{"state":0}}}"#;

/// Get real-time energy meter readings.
///
/// Returns current, voltage, and power. Only meaningful on devices with an
/// energy meter (e.g. HS110); plain HS100 devices answer with an error code.
pub const ENERGY: &str = r#"{"emeter":{"get_realtime":{},"get_vgain_igain":{}}}"#;

/// Turn off the LED indicator light.
pub const LED_OFF: &str = r#"{"system":{"set_led_off":{"off":1}}}"#;

/// Turn on the LED indicator light.
pub const LED_ON: &str = r#"{"system":{"set_led_off":{"off":0}}}"#;

/// Reboot the device with a 1-second delay.
pub const REBOOT: &str = r#"{"system":{"reboot":{"delay":1}}}"#;
