//! Persistent JSON configuration store.
//!
//! One document on disk (`config.json`, or `$PENDECK_CONFIG`). Built-in
//! defaults are deep-merged underneath whatever the user wrote, so every
//! key the runtime reads is always present.
//!
//! Saves are read-merge-write: the document on disk is re-read and the
//! in-memory document merged over it before writing. A second process
//! (for example a companion network service) editing the same file
//! therefore loses at most the keys both sides touched; last writer wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror_no_std::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "PENDECK_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_RESULTS: usize = 100;
const DEFAULT_RESULTS_DIR: &str = "results";
const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON (or not the expected shape)
    #[error("config JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
    /// A dot path was empty or ran through a non-object value
    #[error("invalid config path `{0}`")]
    InvalidPath(String),
}

/// A saved WiFi network entry (`wifi_networks[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    /// Network name
    pub ssid: String,
    /// Pre-shared key
    #[serde(default)]
    pub password: String,
    /// Higher is preferred
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_priority() -> i64 {
    1
}

/// The built-in configuration document.
pub fn defaults() -> Value {
    json!({
        "wifi_networks": [],
        "tools": {
            "nmap": {
                "quick_scan": "nmap -T4 -F {target}",
                "aggressive_scan": "nmap -A -T4 {target}",
                "version_scan": "nmap -sV {target}",
                "stealth_scan": "nmap -sS -T2 {target}"
            },
            "nikto": {
                "basic_scan": "nikto -h {target}",
                "ssl_scan": "nikto -h {target} -ssl"
            },
            "bettercap": {
                "network_discovery": "bettercap -eval 'net.probe on; net.show'",
                "arp_spoof": "bettercap -T {target}"
            },
            "aircrack": {
                "monitor_mode": "airmon-ng start wlan0",
                "capture": "airodump-ng wlan0mon"
            }
        },
        "display": {
            "brightness": 128,
            "contrast": 128,
            "scroll_speed": 2
        },
        "system": {
            "log_level": DEFAULT_LOG_LEVEL,
            "auto_save_results": true,
            "results_directory": DEFAULT_RESULTS_DIR,
            "max_results_files": DEFAULT_MAX_RESULTS
        },
        "advanced": {
            "scan_timeout_seconds": DEFAULT_SCAN_TIMEOUT_SECS
        }
    })
}

/// Recursively merge `overlay` into `base`. Objects merge key by key;
/// anything else in `overlay` replaces what `base` had.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge(existing, value);
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, ConfigError> {
    let keys: Vec<&str> = path.split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        return Err(ConfigError::InvalidPath(path.to_string()));
    }
    Ok(keys)
}

/// The configuration document plus the file it lives in.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    doc: Value,
}

/// A store shared between the runtime's collaborators.
pub type SharedConfig = Arc<RwLock<ConfigStore>>;

impl ConfigStore {
    /// Load `path`, merged over the defaults.
    ///
    /// A missing file is created with the defaults. A file that cannot be
    /// parsed is left alone and the defaults are used in memory.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut doc = defaults();
        match read_document(&path) {
            Ok(Some(user)) => merge(&mut doc, user),
            Ok(None) => {
                let store = Self { path, doc };
                if let Err(e) = store.write(false) {
                    tracing::warn!("could not write default config to {}: {e}", store.path.display());
                } else {
                    tracing::info!("created default config at {}", store.path.display());
                }
                return store;
            }
            Err(e) => {
                tracing::error!("error loading config {}: {e}; using defaults", path.display());
            }
        }
        Self { path, doc }
    }

    /// Load from `$PENDECK_CONFIG`, falling back to `config.json`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load(path)
    }

    /// Wrap for sharing between collaborators.
    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }

    /// File backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole merged document
    pub fn document(&self) -> &Value {
        &self.doc
    }

    // -----------------------------------------------------------------------
    // Dot-path access
    // -----------------------------------------------------------------------

    /// Value at a dot path such as `system.results_directory`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let keys = split_path(path).ok()?;
        keys.iter().try_fold(&self.doc, |node, key| node.get(*key))
    }

    /// Set the value at a dot path, creating intermediate objects, then save.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), ConfigError> {
        let keys = split_path(path)?;
        let Some((last, parents)) = keys.split_last() else {
            return Err(ConfigError::InvalidPath(path.to_string()));
        };
        let mut node = &mut self.doc;
        for key in parents {
            let Value::Object(map) = node else {
                return Err(ConfigError::InvalidPath(path.to_string()));
            };
            node = map
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let Value::Object(map) = node else {
            return Err(ConfigError::InvalidPath(path.to_string()));
        };
        map.insert((*last).to_string(), value);
        self.save()
    }

    fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(Value::as_u64)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Read-merge-write the document to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.write(true)
    }

    fn write(&self, merge_disk: bool) -> Result<(), ConfigError> {
        let mut out = match read_document(&self.path) {
            Ok(Some(disk)) if merge_disk => disk,
            _ => Value::Object(Map::new()),
        };
        merge(&mut out, self.doc.clone());
        write_document(&self.path, &out)
    }

    /// Replace everything with the defaults and overwrite the file.
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.doc = defaults();
        self.write(false)
    }

    /// Write the current document to another file.
    pub fn export_to(&self, path: &Path) -> Result<(), ConfigError> {
        write_document(path, &self.doc)
    }

    /// Replace the document with `path` merged over the defaults, then save.
    pub fn import_from(&mut self, path: &Path) -> Result<(), ConfigError> {
        let imported: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        let mut doc = defaults();
        merge(&mut doc, imported);
        self.doc = doc;
        self.write(false)
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    /// Template for `tools.<tool>.<preset>`
    pub fn tool_command(&self, tool: &str, preset: &str) -> Option<String> {
        self.doc
            .get("tools")
            .and_then(|t| t.get(tool))
            .and_then(|t| t.get(preset))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// All `(preset, template)` pairs for a tool
    pub fn tool_commands(&self, tool: &str) -> Vec<(String, String)> {
        self.doc
            .get("tools")
            .and_then(|t| t.get(tool))
            .and_then(Value::as_object)
            .map(|presets| {
                presets
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store a template under `tools.<tool>.<preset>`.
    pub fn set_tool_command(&mut self, tool: &str, preset: &str, template: &str) -> Result<(), ConfigError> {
        if tool.contains('.') || preset.contains('.') {
            return Err(ConfigError::InvalidPath(format!("tools.{tool}.{preset}")));
        }
        self.set(&format!("tools.{tool}.{preset}"), Value::String(template.to_string()))
    }

    /// Saved networks in file order. Malformed entries are skipped.
    pub fn wifi_networks(&self) -> Vec<WifiNetwork> {
        self.doc
            .get("wifi_networks")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Add a network, or update password and priority of an existing SSID.
    pub fn add_wifi_network(&mut self, ssid: &str, password: &str, priority: i64) -> Result<(), ConfigError> {
        let mut networks = self.wifi_networks();
        match networks.iter_mut().find(|n| n.ssid == ssid) {
            Some(existing) => {
                existing.password = password.to_string();
                existing.priority = priority;
            }
            None => networks.push(WifiNetwork {
                ssid: ssid.to_string(),
                password: password.to_string(),
                priority,
            }),
        }
        self.put_networks(&networks)
    }

    /// Remove a network by SSID. Returns whether anything was removed.
    pub fn remove_wifi_network(&mut self, ssid: &str) -> Result<bool, ConfigError> {
        let mut networks = self.wifi_networks();
        let before = networks.len();
        networks.retain(|n| n.ssid != ssid);
        let removed = networks.len() != before;
        self.put_networks(&networks)?;
        Ok(removed)
    }

    fn put_networks(&mut self, networks: &[WifiNetwork]) -> Result<(), ConfigError> {
        let value = serde_json::to_value(networks)?;
        self.set("wifi_networks", value)
    }

    /// Bound for external tool commands
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(
            self.get_u64("advanced.scan_timeout_seconds")
                .unwrap_or(DEFAULT_SCAN_TIMEOUT_SECS),
        )
    }

    /// Store a new bound for external tool commands, in whole seconds.
    pub fn set_scan_timeout(&mut self, seconds: u64) -> Result<(), ConfigError> {
        self.set("advanced.scan_timeout_seconds", Value::from(seconds))
    }

    /// Directory for saved tool output
    pub fn results_dir(&self) -> PathBuf {
        PathBuf::from(
            self.get_str("system.results_directory")
                .unwrap_or(DEFAULT_RESULTS_DIR),
        )
    }

    /// Result files kept after pruning
    pub fn max_results_files(&self) -> usize {
        self.get_u64("system.max_results_files")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    /// Whether tool output is written to the results directory
    pub fn auto_save_results(&self) -> bool {
        self.get("system.auto_save_results")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Configured log level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`)
    pub fn log_level(&self) -> String {
        self.get_str("system.log_level")
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string()
    }
}

/// `Ok(None)` when the file does not exist.
fn read_document(path: &Path) -> Result<Option<Value>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_document(path: &Path, doc: &Value) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(doc)?)?;
    Ok(())
}

/// Read access that survives a poisoned lock.
pub fn read(config: &SharedConfig) -> RwLockReadGuard<'_, ConfigStore> {
    config.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access that survives a poisoned lock.
pub fn write(config: &SharedConfig) -> RwLockWriteGuard<'_, ConfigStore> {
    config.write().unwrap_or_else(PoisonError::into_inner)
}
