//! System information panels from `/proc`, `/sys`, `df` and `ps`.
//!
//! Values that cannot be read show as `N/A`; only the panels that depend
//! entirely on an external command fail with an error.

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects
)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{CommandExecutor, InfoPanel, ServiceError, SystemInfoProvider};

/// Rows shown on the processes panel.
pub const TOP_PROCESSES: usize = 10;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
const NA: &str = "N/A";

/// Human-readable byte count with one decimal, in 1024 steps.
///
/// ```
/// assert_eq!(pendeck::services::format_bytes(1536), "1.5KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1}PB")
}

/// Reads procfs relative to `root` (normally `/`).
pub struct ProcSystemInfo {
    root: PathBuf,
    executor: Arc<dyn CommandExecutor>,
}

impl ProcSystemInfo {
    /// Provider reading the live system.
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_root("/", executor)
    }

    /// Provider reading `proc/` and `sys/` below `root`.
    pub fn with_root(root: impl Into<PathBuf>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            root: root.into(),
            executor,
        }
    }

    fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root.join(rel)).ok()
    }

    fn command(&self, command: &str) -> Result<String, ServiceError> {
        let exec = self.executor.execute(command, QUERY_TIMEOUT)?;
        if exec.timed_out {
            return Err(ServiceError::Unavailable(format!("`{command}` timed out")));
        }
        Ok(exec.output)
    }

    fn hardware(&self) -> Vec<(String, String)> {
        let platform = self
            .read("proc/sys/kernel/ostype")
            .map_or_else(|| "Linux".to_string(), |s| s.trim().to_string());
        let cores = self
            .read("proc/cpuinfo")
            .map(|s| count_processors(&s))
            .filter(|n| *n > 0)
            .map_or_else(|| NA.to_string(), |n| n.to_string());
        let load = self
            .read("proc/loadavg")
            .and_then(|s| parse_loadavg(&s))
            .unwrap_or_else(|| NA.to_string());
        let mem = self.read("proc/meminfo").map(|s| parse_meminfo(&s));
        let (ram_total, ram_used) = match mem {
            Some(MemInfo {
                total_kb: Some(total),
                available_kb: Some(avail),
            }) if total > 0 => (
                format_bytes(total.saturating_mul(1024)),
                format!("{:.1}%", total.saturating_sub(avail) as f64 / total as f64 * 100.0),
            ),
            Some(MemInfo {
                total_kb: Some(total),
                ..
            }) => (format_bytes(total.saturating_mul(1024)), NA.to_string()),
            _ => (NA.to_string(), NA.to_string()),
        };
        let temp = self
            .read("sys/class/thermal/thermal_zone0/temp")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map_or_else(|| NA.to_string(), |milli| format!("{:.1}C", milli / 1000.0));
        let uptime = self
            .read("proc/uptime")
            .and_then(|s| s.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()))
            .map_or_else(|| NA.to_string(), |secs| format_uptime(secs as u64));

        vec![
            ("Platform".into(), platform),
            ("Machine".into(), std::env::consts::ARCH.to_string()),
            ("CPU Cores".into(), cores),
            ("Load".into(), load),
            ("RAM Total".into(), ram_total),
            ("RAM Used".into(), ram_used),
            ("Temp".into(), temp),
            ("Uptime".into(), uptime),
        ]
    }

    fn network(&self) -> Vec<(String, String)> {
        let hostname = self
            .read("proc/sys/kernel/hostname")
            .map_or_else(|| NA.to_string(), |s| s.trim().to_string());
        let mut rows = vec![("Hostname".to_string(), hostname)];

        match self.command("ip -4 -o addr show") {
            Ok(out) => rows.extend(
                parse_interfaces(&out)
                    .into_iter()
                    .filter(|(name, _)| name != "lo"),
            ),
            Err(e) => tracing::debug!("interface query failed: {e}"),
        }

        if let Some((rx, tx)) = self.read("proc/net/dev").map(|s| parse_net_dev(&s)) {
            rows.push(("Bytes Sent".into(), format_bytes(tx)));
            rows.push(("Bytes Recv".into(), format_bytes(rx)));
        }
        rows
    }

    fn disk(&self) -> Result<Vec<(String, String)>, ServiceError> {
        let out = self.command("df -kP /")?;
        let usage = parse_df(&out)
            .ok_or_else(|| ServiceError::Unavailable("could not read disk usage".to_string()))?;
        Ok(vec![
            ("Total".into(), format_bytes(usage.total_kb.saturating_mul(1024))),
            ("Used".into(), format_bytes(usage.used_kb.saturating_mul(1024))),
            ("Free".into(), format_bytes(usage.free_kb.saturating_mul(1024))),
            ("Usage".into(), usage.percent),
        ])
    }

    fn processes(&self) -> Result<Vec<(String, String)>, ServiceError> {
        let out = self.command("ps -eo pid,comm,%cpu,%mem --sort=-%cpu")?;
        Ok(parse_ps(&out, TOP_PROCESSES))
    }
}

impl SystemInfoProvider for ProcSystemInfo {
    fn snapshot(&self, panel: InfoPanel) -> Result<Vec<(String, String)>, ServiceError> {
        match panel {
            InfoPanel::Hardware => Ok(self.hardware()),
            InfoPanel::Network => Ok(self.network()),
            InfoPanel::Disk => self.disk(),
            InfoPanel::Processes => self.processes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

fn count_processors(cpuinfo: &str) -> usize {
    cpuinfo
        .lines()
        .filter(|l| l.split(':').next().is_some_and(|k| k.trim() == "processor"))
        .count()
}

fn parse_loadavg(loadavg: &str) -> Option<String> {
    let parts: Vec<&str> = loadavg.split_whitespace().take(3).collect();
    (parts.len() == 3).then(|| parts.join(" "))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct MemInfo {
    total_kb: Option<u64>,
    available_kb: Option<u64>,
}

fn parse_meminfo(meminfo: &str) -> MemInfo {
    let mut info = MemInfo::default();
    for line in meminfo.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        match key {
            "MemTotal" => info.total_kb = value,
            "MemAvailable" => info.available_kb = value,
            _ => {}
        }
    }
    info
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// `(interface, address)` per line of `ip -4 -o addr show`.
fn parse_interfaces(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            let name = words.nth(1)?;
            words.find(|w| *w == "inet")?;
            let addr = words.next()?.split('/').next()?;
            Some((name.to_string(), addr.to_string()))
        })
        .collect()
}

/// Total `(rx_bytes, tx_bytes)` over every interface except `lo`.
fn parse_net_dev(dev: &str) -> (u64, u64) {
    dev.lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim() != "lo")
        .filter_map(|(_, counters)| {
            let fields: Vec<u64> = counters
                .split_whitespace()
                .filter_map(|f| f.parse().ok())
                .collect();
            Some((*fields.first()?, *fields.get(8)?))
        })
        .fold((0u64, 0u64), |(rx, tx), (r, t)| (rx.saturating_add(r), tx.saturating_add(t)))
}

#[derive(Debug, PartialEq, Eq)]
struct DiskUsage {
    total_kb: u64,
    used_kb: u64,
    free_kb: u64,
    percent: String,
}

fn parse_df(output: &str) -> Option<DiskUsage> {
    let line = output.lines().nth(1)?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    Some(DiskUsage {
        total_kb: fields.get(1)?.parse().ok()?,
        used_kb: fields.get(2)?.parse().ok()?,
        free_kb: fields.get(3)?.parse().ok()?,
        percent: (*fields.get(4)?).to_string(),
    })
}

/// `("<pid> <name>", "<cpu>%")` for the first `limit` data rows.
fn parse_ps(output: &str, limit: usize) -> Vec<(String, String)> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let pid = fields.first()?;
            let name = fields.get(1)?;
            let cpu = fields.get(2)?;
            Some((format!("{pid} {name}"), format!("{cpu}%")))
        })
        .take(limit)
        .collect()
}
