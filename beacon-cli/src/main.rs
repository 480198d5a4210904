use std::net::IpAddr;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use beacon_server::ServerConfig;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Rendezvous signaling relay for peer-to-peer connection negotiation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server. Flags override the BEACON_* environment.
    Serve {
        /// Listen address.
        #[arg(long)]
        host: Option<IpAddr>,

        /// Listen port.
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds between keep-alive pings.
        #[arg(long)]
        keepalive_interval: Option<u64>,

        /// Seconds of inbound silence before a connection is dropped.
        #[arg(long)]
        keepalive_timeout: Option<u64>,

        /// Disable keep-alive probing entirely.
        #[arg(long)]
        no_keepalive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            keepalive_interval,
            keepalive_timeout,
            no_keepalive,
        } => {
            let mut config = ServerConfig::from_env()?;

            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if no_keepalive {
                config.keep_alive = None;
            } else if keepalive_interval.is_some() || keepalive_timeout.is_some() {
                let mut keep_alive = config.keep_alive.unwrap_or_default();
                if let Some(secs) = keepalive_interval {
                    keep_alive.interval = Duration::from_secs(secs);
                }
                if let Some(secs) = keepalive_timeout {
                    keep_alive.timeout = Duration::from_secs(secs);
                }
                config.keep_alive = Some(keep_alive);
            }

            beacon_server::run(config).await
        }
    }
}
