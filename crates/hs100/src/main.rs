mod cli;
mod handlers;

use clap::Parser;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match cli.command {
        Command::Version => {
            println!("hs100 {}", env!("CARGO_PKG_VERSION"));
            println!("hs100-core {}", hs100_core::VERSION);
        }

        Command::Discover { subnet, timeout } => {
            handlers::handle_discover(subnet, timeout).await;
        }

        Command::Device {
            target,
            port,
            timeout,
            command,
        } => {
            handlers::handle_device(target, port, timeout, command).await;
        }
    }
}
