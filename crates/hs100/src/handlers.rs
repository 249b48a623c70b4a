use std::time::Duration;

use hs100_core::{discovery, send_command, Connector, Device};
use tracing::{debug, error};

use crate::cli::DeviceCommand;

/// Handle the discover command.
pub async fn handle_discover(subnet: String, timeout: Duration) {
    match discovery::discover(&subnet, timeout).await {
        Ok(devices) => {
            debug!(device_count = devices.len(), "discovered devices");
            let json = serde_json::to_value(&devices).unwrap_or_default();
            println!("{}", json);
        }
        Err(e) => {
            error!(error = %e, "discovery failed");
            eprintln!("Error: Discovery failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the device command.
pub async fn handle_device(target: String, port: u16, timeout: Duration, command: DeviceCommand) {
    let connector = Connector::new().with_port(port).with_timeout(timeout);
    let device = Device::new(target.clone(), connector);

    let result = match command {
        DeviceCommand::On => device.turn_on().await.map(|_| "ok".to_string()),
        DeviceCommand::Off => device.turn_off().await.map(|_| "ok".to_string()),
        DeviceCommand::IsOn => device.is_on().await.map(|on| on.to_string()),
        DeviceCommand::Name => device.name().await,
        DeviceCommand::Info => device
            .sysinfo()
            .await
            .map(|info| serde_json::to_value(&info).unwrap_or_default().to_string()),
        DeviceCommand::Energy => device.power_consumption().await.map(|p| {
            serde_json::to_value(p).unwrap_or_default().to_string()
        }),
        DeviceCommand::Raw { json } => {
            debug!(command = %json, "sending raw command");
            send_command(&target, port, timeout, &json)
                .await
                .map(|response| {
                    // Compact-print if it parses as JSON, pass through otherwise.
                    match serde_json::from_str::<serde_json::Value>(&response) {
                        Ok(value) => value.to_string(),
                        Err(_) => response,
                    }
                })
        }
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!(target = %target, port, error = %e, "device command failed");
            eprintln!("Error: {}:{}: {}", target, port, e);
            std::process::exit(1);
        }
    }
}
