//! `sh -c` command execution with a hard deadline.
//!
//! The UI loop is synchronous; each call blocks on a private current-thread
//! tokio runtime for at most the given timeout. A child still running at the
//! deadline is killed when its handle is dropped (`kill_on_drop`).

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use super::{CommandExecutor, Execution, ServiceError};

/// Runs commands through `/bin/sh`.
#[derive(Debug)]
pub struct ShellExecutor {
    runtime: Runtime,
}

impl ShellExecutor {
    /// Build the executor and its runtime.
    pub fn new() -> Result<Self, ServiceError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime })
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str, timeout: Duration) -> Result<Execution, ServiceError> {
        tracing::info!("executing: {command}");
        let result = self.runtime.block_on(run(command, timeout));
        match &result {
            Ok(exec) if exec.timed_out => {
                tracing::warn!("`{command}` killed after {}s", timeout.as_secs());
            }
            Ok(_) => tracing::debug!("`{command}` finished"),
            Err(e) => tracing::error!("{e}"),
        }
        result
    }
}

async fn run(command: &str, timeout: Duration) -> Result<Execution, ServiceError> {
    let spawn_error = |source| ServiceError::Spawn {
        command: command.to_string(),
        source,
    };

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error)?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(Execution::from_streams(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )),
        Ok(Err(source)) => Err(spawn_error(source)),
        Err(_elapsed) => Ok(Execution::deadline_exceeded(timeout)),
    }
}
