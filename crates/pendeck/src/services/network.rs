//! WiFi status from the `ip`/`iw*` tools and saved networks from config.

use std::sync::Arc;
use std::time::Duration;

use super::{CommandExecutor, NetworkStatus, NetworkStatusProvider, SavedNetwork, ServiceError};
use crate::config::{self, SharedConfig};

/// Interface queried for status.
pub const WIFI_INTERFACE: &str = "wlan0";

/// Priority given to networks added from the device.
pub const ADDED_NETWORK_PRIORITY: i64 = 1;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Status via `ip -4 -o addr`, `iwgetid` and `iwconfig`.
pub struct SystemNetwork {
    executor: Arc<dyn CommandExecutor>,
    config: SharedConfig,
    interface: String,
}

impl SystemNetwork {
    /// Provider for [`WIFI_INTERFACE`].
    pub fn new(executor: Arc<dyn CommandExecutor>, config: SharedConfig) -> Self {
        Self {
            executor,
            config,
            interface: WIFI_INTERFACE.to_string(),
        }
    }

    /// Query a different interface.
    #[must_use]
    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interface = interface.to_string();
        self
    }

    /// Command output, or `None` on error, timeout or empty output.
    fn query(&self, command: &str) -> Option<String> {
        match self.executor.execute(command, QUERY_TIMEOUT) {
            Ok(exec) if !exec.timed_out => {
                let out = exec.output.trim();
                (!out.is_empty() && out != super::NO_OUTPUT).then(|| out.to_string())
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("`{command}` failed: {e}");
                None
            }
        }
    }
}

/// First IPv4 address in `ip -4 -o addr show` output, without prefix length.
pub fn parse_inet4(output: &str) -> Option<String> {
    let mut words = output.split_whitespace();
    words.find(|w| *w == "inet")?;
    let addr = words.next()?;
    Some(addr.split('/').next().unwrap_or(addr).to_string())
}

/// The `Signal level=` value in `iwconfig` output, e.g. `-52 dBm`.
pub fn parse_signal(output: &str) -> Option<String> {
    let (_, rest) = output.split_once("Signal level=")?;
    let value = rest.split("  ").next().unwrap_or(rest).trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl NetworkStatusProvider for SystemNetwork {
    fn status(&self) -> Result<NetworkStatus, ServiceError> {
        let iface = &self.interface;
        let ip = self
            .query(&format!("ip -4 -o addr show {iface}"))
            .and_then(|out| parse_inet4(&out));
        let ssid = self.query(&format!("iwgetid {iface} --raw"));
        let signal = self
            .query(&format!("iwconfig {iface}"))
            .and_then(|out| parse_signal(&out));
        Ok(NetworkStatus {
            connected: ip.is_some(),
            ssid,
            ip,
            signal,
        })
    }

    fn saved_networks(&self) -> Result<Vec<SavedNetwork>, ServiceError> {
        let mut networks: Vec<SavedNetwork> = config::read(&self.config)
            .wifi_networks()
            .into_iter()
            .map(|n| SavedNetwork {
                ssid: n.ssid,
                priority: n.priority,
            })
            .collect();
        // stable: equal priorities keep insertion order
        networks.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(networks)
    }

    fn add_network(&self, ssid: &str, secret: &str) -> Result<(), ServiceError> {
        config::write(&self.config).add_wifi_network(ssid, secret, ADDED_NETWORK_PRIORITY)?;
        tracing::info!("saved network {ssid}");
        Ok(())
    }
}
