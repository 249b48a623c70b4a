//! Discovery of HS1xx devices by scanning an IPv4 subnet.
//!
//! Every host address in the given CIDR block is probed with the sysinfo
//! command over TCP; addresses that answer with a parseable sysinfo
//! response are reported. Probes run concurrently, one task per candidate
//! address, each with its own independent exchange.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    commands,
    connector::{send_command, DEFAULT_PORT},
    error::Error,
    response::SysInfoResponse,
};

/// A device found during a subnet scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// IP address of the device.
    pub ip: Ipv4Addr,
    /// TCP port the device was probed on.
    pub port: u16,
    /// Device alias/name set by the user.
    pub alias: String,
    /// Device model (e.g., "HS110(EU)").
    pub model: String,
    /// MAC address.
    pub mac: String,
    /// Software/firmware version.
    pub sw_ver: String,
    /// Current relay state (true = on).
    pub relay_state: bool,
}

/// Scans a subnet for HS1xx devices.
///
/// # Arguments
///
/// * `subnet` - IPv4 CIDR block, e.g. `"192.168.2.0/24"`
/// * `probe_timeout` - Connect and I/O timeout applied to each probe
///
/// # Errors
///
/// Returns [`Error::Parse`] for a malformed CIDR. Individual probe
/// failures (closed ports, timeouts, non-device hosts) are expected and
/// simply excluded from the result.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use hs100_core::discovery::discover;
///
/// #[tokio::main]
/// async fn main() -> Result<(), hs100_core::Error> {
///     let devices = discover("192.168.2.0/24", Duration::from_secs(1)).await?;
///     for d in devices {
///         println!("{} {} at {}", d.alias, d.model, d.ip);
///     }
///     Ok(())
/// }
/// ```
pub async fn discover(
    subnet: &str,
    probe_timeout: Duration,
) -> Result<Vec<DiscoveredDevice>, Error> {
    let hosts = subnet_hosts(subnet)?;
    debug!(subnet = %subnet, candidates = hosts.len(), "scanning subnet");

    let probes: Vec<_> = hosts
        .into_iter()
        .map(|ip| probe(ip, probe_timeout))
        .collect();

    let devices: Vec<DiscoveredDevice> = futures::future::join_all(probes)
        .await
        .into_iter()
        .flatten()
        .collect();

    debug!(found = devices.len(), "scan finished");
    Ok(devices)
}

/// Probes one address with the sysinfo command.
async fn probe(ip: Ipv4Addr, probe_timeout: Duration) -> Option<DiscoveredDevice> {
    let response = send_command(&ip.to_string(), DEFAULT_PORT, probe_timeout, commands::INFO)
        .await
        .ok()?;

    // Anything listening on 9999 that does not speak the protocol gets
    // filtered out here.
    let parsed: SysInfoResponse = serde_json::from_str(&response).ok()?;
    let info = parsed.system.get_sysinfo;

    debug!(ip = %ip, alias = %info.alias, model = %info.model, "device found");

    Some(DiscoveredDevice {
        ip,
        port: DEFAULT_PORT,
        alias: info.alias,
        model: info.model,
        mac: info.mac,
        sw_ver: info.sw_ver,
        relay_state: info.relay_state == 1,
    })
}

/// Expands an IPv4 CIDR block into its host addresses.
///
/// Network and broadcast addresses are excluded for prefixes shorter than
/// /31; a /31 yields both addresses and a /32 yields the single address.
fn subnet_hosts(subnet: &str) -> Result<Vec<Ipv4Addr>, Error> {
    let (addr_part, prefix_part) = subnet
        .split_once('/')
        .ok_or_else(|| Error::Parse(format!("invalid subnet {:?}: missing prefix", subnet)))?;

    let addr: Ipv4Addr = addr_part
        .parse()
        .map_err(|e| Error::Parse(format!("invalid subnet {:?}: {}", subnet, e)))?;

    let prefix: u32 = prefix_part
        .parse()
        .map_err(|e| Error::Parse(format!("invalid subnet {:?}: {}", subnet, e)))?;
    if prefix > 32 {
        return Err(Error::Parse(format!(
            "invalid subnet {:?}: prefix must be <= 32",
            subnet
        )));
    }

    let base = u32::from(addr);
    let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    let network = base & mask;
    let broadcast = network | !mask;

    let range = match prefix {
        32 => network..=network,
        31 => network..=broadcast,
        _ => network + 1..=broadcast - 1,
    };

    Ok(range.map(Ipv4Addr::from).collect())
}
