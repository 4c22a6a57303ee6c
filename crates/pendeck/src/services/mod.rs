//! External collaborators the UI runtime calls into.
//!
//! The runtime only ever sees the traits in this module. Each one has a
//! production implementation that shells out or reads `/proc`, and the
//! runtime tests supply fakes.
//!
//! ```text
//! Runtime ──► ToolRunner ──────────► CommandExecutor (sh -c, bounded)
//!        ├──► NetworkStatusProvider ─┘  + ConfigStore (saved networks)
//!        ├──► SystemInfoProvider ────┘  + /proc, /sys
//!        └──► PowerControl ──────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror_no_std::Error;

use crate::config::ConfigError;

pub mod executor;
pub mod network;
pub mod power;
pub mod sysinfo;
pub mod tools;

pub use executor::ShellExecutor;
pub use network::SystemNetwork;
pub use power::SystemPower;
pub use sysinfo::{format_bytes, ProcSystemInfo};
pub use tools::{ToolRun, ToolRunner};

/// Collaborator errors. The runtime renders these as an error screen.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The process could not be started or waited on
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying error
        source: std::io::Error,
    },
    /// No template for this tool/preset pair
    #[error("Command '{preset}' not found for tool '{tool}'")]
    UnknownCommand {
        /// Tool id
        tool: String,
        /// Preset id
        preset: String,
    },
    /// Configuration could not be read or saved
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The collaborator exists but cannot answer right now
    #[error("{0}")]
    Unavailable(String),
}

/// Outcome of one bounded external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Combined, display-ready output
    pub output: String,
    /// Whether the command was killed at its deadline
    pub timed_out: bool,
}

/// Separator between stdout and stderr in combined output.
pub const STDERR_SEPARATOR: &str = "\n--- STDERR ---\n";

/// Output used when a command printed nothing.
pub const NO_OUTPUT: &str = "Command completed with no output";

impl Execution {
    /// Combine captured streams: stdout, then the stderr block if stderr
    /// is non-empty.
    pub fn from_streams(stdout: &str, stderr: &str) -> Self {
        let mut output = String::from(stdout);
        if !stderr.is_empty() {
            output.push_str(STDERR_SEPARATOR);
            output.push_str(stderr);
        }
        if output.trim().is_empty() {
            output = NO_OUTPUT.to_string();
        }
        Self {
            output,
            timed_out: false,
        }
    }

    /// The command was killed after `after`.
    pub fn deadline_exceeded(after: Duration) -> Self {
        Self {
            output: format!("Error: Command timed out after {} seconds", after.as_secs()),
            timed_out: true,
        }
    }
}

/// Runs a command line with a deadline.
///
/// On timeout the process is killed and `Execution::timed_out` is set;
/// that is not an `Err`.
pub trait CommandExecutor {
    /// Run `command` through the shell, bounded by `timeout`.
    fn execute(&self, command: &str, timeout: Duration) -> Result<Execution, ServiceError>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn execute(&self, command: &str, timeout: Duration) -> Result<Execution, ServiceError> {
        (**self).execute(command, timeout)
    }
}

/// Current WiFi link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStatus {
    /// Interface has an IPv4 address
    pub connected: bool,
    /// Associated network
    pub ssid: Option<String>,
    /// IPv4 address
    pub ip: Option<String>,
    /// Signal level as reported by the driver (e.g. `-52 dBm`)
    pub signal: Option<String>,
}

impl NetworkStatus {
    /// Rows for a status screen
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let na = || "N/A".to_string();
        vec![
            (
                "Status".to_string(),
                if self.connected { "Connected" } else { "Disconnected" }.to_string(),
            ),
            ("SSID".to_string(), self.ssid.clone().unwrap_or_else(na)),
            ("IP".to_string(), self.ip.clone().unwrap_or_else(na)),
            ("Signal".to_string(), self.signal.clone().unwrap_or_else(na)),
        ]
    }
}

/// A saved network as shown to the user (no secret).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNetwork {
    /// Network name
    pub ssid: String,
    /// Higher is preferred
    pub priority: i64,
}

/// WiFi state and saved networks.
pub trait NetworkStatusProvider {
    /// Current link
    fn status(&self) -> Result<NetworkStatus, ServiceError>;
    /// Saved networks, highest priority first
    fn saved_networks(&self) -> Result<Vec<SavedNetwork>, ServiceError>;
    /// Save a network; an existing SSID is updated in place
    fn add_network(&self, ssid: &str, secret: &str) -> Result<(), ServiceError>;
}

/// Which system-info panel to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPanel {
    /// Platform, CPU, memory, temperature
    Hardware,
    /// Hostname, interface addresses, traffic
    Network,
    /// Root filesystem usage
    Disk,
    /// Top processes by CPU
    Processes,
}

impl InfoPanel {
    /// Title bar text for the panel
    pub fn title(self) -> &'static str {
        match self {
            Self::Hardware => "Hardware",
            Self::Network => "Network Info",
            Self::Disk => "Disk Usage",
            Self::Processes => "Processes",
        }
    }
}

/// Key/value snapshots of the running system.
pub trait SystemInfoProvider {
    /// Ordered rows for `panel`
    fn snapshot(&self, panel: InfoPanel) -> Result<Vec<(String, String)>, ServiceError>;
}

/// Halts the device.
pub trait PowerControl {
    /// Begin an orderly shutdown
    fn power_off(&self) -> Result<(), ServiceError>;
}

/// Everything the runtime dispatches leaf actions to.
pub struct Services {
    /// Tool templates, execution and result files
    pub tools: ToolRunner,
    /// WiFi status and saved networks
    pub network: Box<dyn NetworkStatusProvider>,
    /// System info panels
    pub system: Box<dyn SystemInfoProvider>,
    /// Shutdown
    pub power: Box<dyn PowerControl>,
}

impl core::fmt::Debug for Services {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Services")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}
