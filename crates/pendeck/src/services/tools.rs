//! Tool presets: template lookup, execution and result files.
//!
//! Results land in `<results_dir>/<tool>_<preset>_<YYYYmmdd_HHMMSS>.txt`:
//!
//! ```text
//! Tool: nmap
//! Command: quick_scan
//! Target: 10.0.0.1
//! Timestamp: 2026-03-01T12:00:00+00:00
//! ==================================================
//!
//! <output>
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::Local;

use super::{CommandExecutor, ServiceError};
use crate::config::{self, SharedConfig};

/// Port substituted for `{port}`.
pub const DEFAULT_PORT: u16 = 80;

/// How many result names "View Results" lists.
pub const RECENT_RESULTS_LIMIT: usize = 10;

const RULE_WIDTH: usize = 50;

/// One completed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRun {
    /// Display-ready output
    pub output: String,
    /// Killed at the deadline
    pub timed_out: bool,
    /// Result file, when saving is enabled and succeeded
    pub saved: Option<PathBuf>,
}

/// Runs configured tool presets and manages the results directory.
pub struct ToolRunner {
    executor: Arc<dyn CommandExecutor>,
    config: SharedConfig,
}

impl core::fmt::Debug for ToolRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolRunner")
            .field("results_dir", &config::read(&self.config).results_dir())
            .finish_non_exhaustive()
    }
}

/// Fill `{target}` and `{port}` in a command template.
pub fn substitute(template: &str, target: &str) -> String {
    template
        .replace("{target}", target)
        .replace("{port}", &DEFAULT_PORT.to_string())
}

impl ToolRunner {
    /// Runner over `executor`, reading templates and limits from `config`.
    pub fn new(executor: Arc<dyn CommandExecutor>, config: SharedConfig) -> Self {
        Self { executor, config }
    }

    /// Run `tools.<tool>.<preset>` against `target`.
    pub fn run_preset(&self, tool: &str, preset: &str, target: &str) -> Result<ToolRun, ServiceError> {
        let template = config::read(&self.config)
            .tool_command(tool, preset)
            .ok_or_else(|| ServiceError::UnknownCommand {
                tool: tool.to_string(),
                preset: preset.to_string(),
            })?;
        let command = substitute(&template, target);
        self.run(tool, preset, target, &command)
    }

    /// Bound applied to the next tool run
    pub fn scan_timeout(&self) -> Duration {
        config::read(&self.config).scan_timeout()
    }

    /// Change the bound for later tool runs and persist it.
    pub fn set_scan_timeout(&self, seconds: u64) -> Result<(), ServiceError> {
        config::write(&self.config).set_scan_timeout(seconds)?;
        Ok(())
    }

    /// Run a free-form command line, saved under `<tool>_custom_*`.
    pub fn run_custom(&self, tool: &str, command: &str) -> Result<ToolRun, ServiceError> {
        self.run(tool, "custom", "N/A", command)
    }

    fn run(&self, tool: &str, preset: &str, target: &str, command: &str) -> Result<ToolRun, ServiceError> {
        let (timeout, auto_save) = {
            let cfg = config::read(&self.config);
            (cfg.scan_timeout(), cfg.auto_save_results())
        };
        let exec = self.executor.execute(command, timeout)?;

        let saved = if auto_save {
            match self.save_result(tool, preset, target, &exec.output) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::error!("failed to save {tool} result: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(ToolRun {
            output: exec.output,
            timed_out: exec.timed_out,
            saved,
        })
    }

    /// Write one result file and prune old ones.
    pub fn save_result(&self, tool: &str, preset: &str, target: &str, output: &str) -> Result<PathBuf, ServiceError> {
        let (dir, keep) = {
            let cfg = config::read(&self.config);
            (cfg.results_dir(), cfg.max_results_files())
        };
        fs::create_dir_all(&dir)?;

        let now = Local::now();
        let stem = format!("{tool}_{preset}_{}", now.format("%Y%m%d_%H%M%S"));
        let path = unique_path(&dir, &stem);

        let body = format!(
            "Tool: {tool}\nCommand: {preset}\nTarget: {target}\nTimestamp: {}\n{}\n\n{output}",
            now.to_rfc3339(),
            "=".repeat(RULE_WIDTH),
        );
        fs::write(&path, body)?;
        tracing::info!("result saved to {}", path.display());

        self.prune(&dir, keep)?;
        Ok(path)
    }

    fn prune(&self, dir: &Path, keep: usize) -> Result<(), ServiceError> {
        let files = results_by_age(dir)?;
        for (path, _) in files.iter().skip(keep) {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("could not remove old result {}: {e}", path.display());
            } else {
                tracing::debug!("pruned {}", path.display());
            }
        }
        Ok(())
    }

    /// Result file names, newest first.
    pub fn recent_results(&self, limit: usize) -> Result<Vec<String>, ServiceError> {
        let dir = config::read(&self.config).results_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        Ok(results_by_age(&dir)?
            .into_iter()
            .take(limit)
            .filter_map(|(path, _)| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect())
    }

    /// Contents of a result file by name. Names containing path
    /// separators are rejected.
    pub fn result_content(&self, name: &str) -> Result<String, ServiceError> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return Err(ServiceError::Unavailable(format!("invalid result name `{name}`")));
        }
        let path = config::read(&self.config).results_dir().join(name);
        Ok(fs::read_to_string(path)?)
    }

    /// Whether `tool` is on `PATH`.
    pub fn is_tool_available(&self, tool: &str) -> bool {
        if tool.is_empty() || !tool.chars().all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c)) {
            return false;
        }
        match self
            .executor
            .execute(&format!("which {tool}"), std::time::Duration::from_secs(5))
        {
            Ok(exec) => !exec.timed_out && exec.output.trim_start().starts_with('/'),
            Err(_) => false,
        }
    }
}

fn unique_path(dir: &Path, stem: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.txt"));
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.txt")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// `.txt` files in `dir`, newest modification first.
fn results_by_age(dir: &Path) -> Result<Vec<(PathBuf, SystemTime)>, ServiceError> {
    let mut files: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e == "txt") && p.is_file())
        .map(|p| {
            let modified = fs::metadata(&p)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (p, modified)
        })
        .collect();
    files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    Ok(files)
}
