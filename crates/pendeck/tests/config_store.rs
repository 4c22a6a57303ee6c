//! Configuration store against a real file system.
//!
//! Run with: cargo test -p pendeck --test config_store

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::fs;
use std::time::Duration;

use pendeck::config::{self, defaults, ConfigStore, WifiNetwork};
use serde_json::{json, Value};

fn on_disk(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");

    let store = ConfigStore::load(&path);
    assert!(path.exists());
    assert_eq!(on_disk(&path), defaults());
    assert_eq!(store.document(), &defaults());
}

#[test]
fn test_user_values_merge_over_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    fs::write(
        &path,
        r#"{"tools": {"nmap": {"quick_scan": "nmap -F {target}"}}, "advanced": {"scan_timeout_seconds": 60}}"#,
    )
    .unwrap();

    let store = ConfigStore::load(&path);
    assert_eq!(
        store.tool_command("nmap", "quick_scan").as_deref(),
        Some("nmap -F {target}")
    );
    // untouched siblings come from the defaults
    assert_eq!(
        store.tool_command("nmap", "version_scan").as_deref(),
        Some("nmap -sV {target}")
    );
    assert_eq!(store.scan_timeout(), Duration::from_secs(60));
    assert_eq!(store.max_results_files(), 100);
    assert!(store.auto_save_results());
}

#[test]
fn test_invalid_json_falls_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let store = ConfigStore::load(&path);
    assert_eq!(store.document(), &defaults());
    // the broken file is left for the user to fix
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_set_and_get_dot_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    let mut store = ConfigStore::load(&path);

    store.set("display.brightness", json!(42)).unwrap();
    store.set("extra.nested.flag", json!(true)).unwrap();
    assert_eq!(store.get("display.brightness"), Some(&json!(42)));
    assert_eq!(store.get("extra.nested.flag"), Some(&json!(true)));
    assert_eq!(store.get("display.missing"), None);

    let disk = on_disk(&path);
    assert_eq!(disk["display"]["brightness"], 42);
    assert_eq!(disk["extra"]["nested"]["flag"], true);

    assert!(store.set("", json!(1)).is_err());
    assert!(store.set("display.brightness.deeper", json!(1)).is_err());
}

#[test]
fn test_save_keeps_keys_written_by_another_process() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    let mut store = ConfigStore::load(&path);

    let mut other = on_disk(&path);
    other["companion"] = json!({"port": 8080});
    fs::write(&path, serde_json::to_string(&other).unwrap()).unwrap();

    store.set("system.log_level", json!("DEBUG")).unwrap();
    let disk = on_disk(&path);
    assert_eq!(disk["companion"]["port"], 8080);
    assert_eq!(disk["system"]["log_level"], "DEBUG");
    assert_eq!(store.log_level(), "DEBUG");
}

#[test]
fn test_wifi_networks_add_update_remove() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    let mut store = ConfigStore::load(&path);

    store.add_wifi_network("home", "secret", 5).unwrap();
    store.add_wifi_network("lab", "pw", 1).unwrap();
    store.add_wifi_network("home", "changed", 3).unwrap();

    assert_eq!(
        store.wifi_networks(),
        vec![
            WifiNetwork {
                ssid: "home".into(),
                password: "changed".into(),
                priority: 3
            },
            WifiNetwork {
                ssid: "lab".into(),
                password: "pw".into(),
                priority: 1
            },
        ]
    );

    assert!(store.remove_wifi_network("lab").unwrap());
    assert!(!store.remove_wifi_network("lab").unwrap());
    assert_eq!(on_disk(&path)["wifi_networks"].as_array().unwrap().len(), 1);
}

#[test]
fn test_tool_templates() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = ConfigStore::load(tmp.path().join("config.json"));

    let nikto = store.tool_commands("nikto");
    assert_eq!(nikto.len(), 2);
    assert!(nikto.iter().any(|(k, v)| k == "ssl_scan" && v == "nikto -h {target} -ssl"));

    store.set_tool_command("nikto", "full", "nikto -h {target} -C all").unwrap();
    assert_eq!(store.tool_commands("nikto").len(), 3);
    assert!(store.set_tool_command("nik.to", "x", "y").is_err());
    assert!(store.tool_commands("nonexistent").is_empty());
}

#[test]
fn test_reset_export_import() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    let exported = tmp.path().join("backup.json");
    let mut store = ConfigStore::load(&path);

    store.set("display.brightness", json!(10)).unwrap();
    store.export_to(&exported).unwrap();

    store.reset_to_defaults().unwrap();
    assert_eq!(store.get("display.brightness"), Some(&json!(128)));
    assert_eq!(on_disk(&path), defaults());

    store.import_from(&exported).unwrap();
    assert_eq!(store.get("display.brightness"), Some(&json!(10)));
    assert_eq!(on_disk(&path)["display"]["brightness"], 10);
}

#[test]
fn test_shared_store_survives_readers_and_writers() {
    let tmp = tempfile::tempdir().unwrap();
    let shared = ConfigStore::load(tmp.path().join("config.json")).shared();

    config::write(&shared)
        .set("system.max_results_files", json!(5))
        .unwrap();
    assert_eq!(config::read(&shared).max_results_files(), 5);
    assert_eq!(
        config::read(&shared).results_dir(),
        std::path::PathBuf::from("results")
    );
}
