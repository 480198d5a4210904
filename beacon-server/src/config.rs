use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};

/// Fixed well-known signaling port, overridable via `BEACON_PORT`.
pub const DEFAULT_PORT: u16 = 8765;

/// Keep-alive probing for the WebSocket transport: a ping every
/// `interval`, and a connection with no inbound traffic for `timeout` is
/// treated exactly like a disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for KeepAlive {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// `None` disables keep-alive probing entirely.
    pub keep_alive: Option<KeepAlive>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            keep_alive: Some(KeepAlive::default()),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment. Unset variables fall back
    /// to defaults; set-but-unparseable values are errors.
    ///
    /// Recognized: `BEACON_HOST`, `BEACON_PORT`, `BEACON_KEEPALIVE`
    /// (`off`/`false`/`0` disables probing),
    /// `BEACON_KEEPALIVE_INTERVAL_SECS`, `BEACON_KEEPALIVE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("BEACON_HOST") {
            config.host = host
                .parse()
                .with_context(|| format!("BEACON_HOST is not a valid address: {host}"))?;
        }
        if let Ok(port) = env::var("BEACON_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("BEACON_PORT is not a valid port: {port}"))?;
        }

        if let Ok(enabled) = env::var("BEACON_KEEPALIVE") {
            if matches!(enabled.as_str(), "off" | "false" | "0") {
                config.keep_alive = None;
                return Ok(config);
            }
        }

        if let Some(keep_alive) = config.keep_alive.as_mut() {
            if let Ok(secs) = env::var("BEACON_KEEPALIVE_INTERVAL_SECS") {
                keep_alive.interval = Duration::from_secs(
                    secs.parse()
                        .with_context(|| format!("BEACON_KEEPALIVE_INTERVAL_SECS: {secs}"))?,
                );
            }
            if let Ok(secs) = env::var("BEACON_KEEPALIVE_TIMEOUT_SECS") {
                keep_alive.timeout = Duration::from_secs(
                    secs.parse()
                        .with_context(|| format!("BEACON_KEEPALIVE_TIMEOUT_SECS: {secs}"))?,
                );
            }
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
