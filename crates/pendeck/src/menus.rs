//! The Pen-Deck menu catalog and the actions its leaves dispatch.

use ui::{MenuDefinition, MenuSet, MenuTree, NumericBounds, Target, TextRequest};

use crate::services::InfoPanel;

/// What a menu leaf asks the runtime to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run `tools.<tool>.<preset>` against the entered target
    RunPreset {
        /// Tool id (`nmap`, `nikto`, ...)
        tool: String,
        /// Preset id (`quick_scan`, ...)
        preset: String,
    },
    /// Run the entered command line, filed under `tool`
    RunCustom {
        /// Tool id, or `custom` for the free-form entry
        tool: String,
    },
    /// List recent result files
    ViewResults,
    /// Set `advanced.scan_timeout_seconds` from the entered number
    SetScanTimeout,
    /// Show the WiFi link
    NetworkStatus,
    /// Pick a saved network and show its entry
    SavedNetworks,
    /// SSID, then password, then save
    AddNetwork,
    /// Show one system-info panel
    SystemInfo(InfoPanel),
    /// Halt the device
    PowerOff,
}

/// Tools with a submenu: `(menu id, title, presets)`.
const TOOLS: &[(&str, &str, &[&str])] = &[
    ("nmap", "Nmap", &["Quick Scan", "Aggressive Scan", "Version Scan", "Stealth Scan"]),
    ("nikto", "Nikto", &["Basic Scan", "SSL Scan"]),
    ("bettercap", "Bettercap", &["Network Discovery", "ARP Spoof"]),
    ("aircrack", "Aircrack-ng", &["Monitor Mode", "Capture"]),
];

const CUSTOM: &str = "Custom";

/// Accepted range for the tool-run bound, in seconds.
pub const SCAN_TIMEOUT_BOUNDS: NumericBounds = NumericBounds::new(Some(1), Some(3600));

/// Config key for a preset label: lowercase, spaces to `_`.
pub fn preset_id(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

fn target_request() -> TextRequest {
    TextRequest::new("Target", "Enter target IP/URL:")
}

/// Build the full menu tree.
pub fn catalog() -> MenuTree<Action> {
    let mut menus = MenuSet::new()
        .with(MenuDefinition::new(
            "main",
            "Pen-Deck",
            &["Pentest Tools", "Network Settings", "System Info", "Power Off"],
        ))
        .with(MenuDefinition::new(
            "pentest_tools",
            "Pentest Tools",
            &[
                "Nmap",
                "Nikto",
                "Bettercap",
                "Aircrack-ng",
                "Custom Command",
                "View Results",
                "Scan Timeout",
            ],
        ))
        .with(MenuDefinition::new(
            "network_settings",
            "Network",
            &["View Status", "Saved Networks", "Add Network"],
        ))
        .with(MenuDefinition::new(
            "system_info",
            "System",
            &["Hardware Info", "Network Info", "Disk Usage", "Processes"],
        ));

    for (id, title, presets) in TOOLS {
        let mut items: Vec<&str> = presets.to_vec();
        items.push(CUSTOM);
        menus = menus.with(MenuDefinition::new(id, title, &items));
    }

    let mut tree = MenuTree::new(menus)
        .link("main", "Pentest Tools", Target::Submenu("pentest_tools".into()))
        .link("main", "Network Settings", Target::Submenu("network_settings".into()))
        .link("main", "System Info", Target::Submenu("system_info".into()))
        .link("main", "Power Off", Target::Action(Action::PowerOff))
        .link(
            "pentest_tools",
            "Custom Command",
            Target::Input {
                request: TextRequest::new("Custom Command", "Enter command:"),
                action: Action::RunCustom {
                    tool: "custom".into(),
                },
            },
        )
        .link("pentest_tools", "View Results", Target::Action(Action::ViewResults))
        .link(
            "pentest_tools",
            "Scan Timeout",
            Target::Input {
                request: TextRequest::numeric("Scan Timeout", "Seconds (1-3600):", SCAN_TIMEOUT_BOUNDS),
                action: Action::SetScanTimeout,
            },
        )
        .link("network_settings", "View Status", Target::Action(Action::NetworkStatus))
        .link("network_settings", "Saved Networks", Target::Action(Action::SavedNetworks))
        .link(
            "network_settings",
            "Add Network",
            Target::Input {
                request: TextRequest::new("Add Network", "Enter SSID:"),
                action: Action::AddNetwork,
            },
        )
        .link("system_info", "Hardware Info", Target::Action(Action::SystemInfo(InfoPanel::Hardware)))
        .link("system_info", "Network Info", Target::Action(Action::SystemInfo(InfoPanel::Network)))
        .link("system_info", "Disk Usage", Target::Action(Action::SystemInfo(InfoPanel::Disk)))
        .link("system_info", "Processes", Target::Action(Action::SystemInfo(InfoPanel::Processes)));

    for (id, title, presets) in TOOLS {
        tree = tree.link("pentest_tools", title, Target::Submenu((*id).to_string()));
        for label in *presets {
            tree = tree.link(
                id,
                label,
                Target::Input {
                    request: target_request(),
                    action: Action::RunPreset {
                        tool: (*id).to_string(),
                        preset: preset_id(label),
                    },
                },
            );
        }
        tree = tree.link(
            id,
            CUSTOM,
            Target::Input {
                request: TextRequest::new("Custom Command", &format!("Enter {id} command:")),
                action: Action::RunCustom {
                    tool: (*id).to_string(),
                },
            },
        );
    }

    tree
}
