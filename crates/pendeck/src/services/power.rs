//! Shutdown through the system's `shutdown` command.

use std::sync::Arc;
use std::time::Duration;

use super::{CommandExecutor, PowerControl, ServiceError};

/// Command used to halt the device.
pub const SHUTDOWN_COMMAND: &str = "sudo shutdown -h now";

/// Halts via [`SHUTDOWN_COMMAND`].
pub struct SystemPower {
    executor: Arc<dyn CommandExecutor>,
}

impl SystemPower {
    /// Power control over `executor`
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }
}

impl PowerControl for SystemPower {
    fn power_off(&self) -> Result<(), ServiceError> {
        tracing::info!("shutting down");
        let exec = self.executor.execute(SHUTDOWN_COMMAND, Duration::from_secs(10))?;
        if exec.timed_out {
            return Err(ServiceError::Unavailable("shutdown did not respond".to_string()));
        }
        Ok(())
    }
}
