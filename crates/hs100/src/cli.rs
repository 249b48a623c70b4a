use std::time::Duration;

use clap::{Parser, Subcommand};

pub fn parse_duration(arg: &str) -> Result<Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(Duration::from_secs(seconds))
}

/// TP-Link HS1xx smart plug client
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a subnet for devices
    Discover {
        /// IPv4 CIDR block to scan, e.g. 192.168.2.0/24
        subnet: String,

        /// Per-host probe timeout in seconds
        #[arg(long, value_parser = parse_duration, default_value = "1")]
        timeout: Duration,
    },

    /// Show version information for CLI and core library
    Version,

    /// Send a command to a specific device
    Device {
        /// Target hostname or IP address
        target: String,

        /// Target port
        #[arg(short, long, default_value_t = hs100_core::DEFAULT_PORT)]
        port: u16,

        /// Timeout in seconds for connect and I/O
        #[arg(long, value_parser = parse_duration, default_value = "10")]
        timeout: Duration,

        #[command(subcommand)]
        command: DeviceCommand,
    },
}

/// Commands available for single device operations
#[derive(Subcommand)]
pub enum DeviceCommand {
    /// Turn relay on
    On,
    /// Turn relay off
    Off,
    /// Show whether the relay is on
    IsOn,
    /// Show the device alias
    Name,
    /// Get system info
    Info,
    /// Get real-time energy readings
    Energy,
    /// Send raw JSON command
    Raw {
        /// JSON command string
        json: String,
    },
}
