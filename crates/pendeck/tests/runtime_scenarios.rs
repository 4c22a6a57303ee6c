//! End-to-end runtime scenarios: scripted buttons in, painted frames and
//! collaborator calls out. No hardware, no real commands.
//!
//! Run with: cargo test -p pendeck --test runtime_scenarios

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use platform::mocks::{ManualClock, RecordingPanel, ScriptedButtons};
use platform::{Button, ButtonSource, Clock, PanelDriver};
use tempfile::TempDir;
use ui::{ButtonBinding, Mode, ResultView, Screen, STATUS_DWELL_MS, TEXT_DWELL_MS};

use pendeck::config::ConfigStore;
use pendeck::display::NoPanel;
use pendeck::services::{
    CommandExecutor, Execution, InfoPanel, NetworkStatus, NetworkStatusProvider, PowerControl,
    SavedNetwork, ServiceError, Services, SystemInfoProvider, ToolRunner,
};
use pendeck::{DisplayMode, Runtime};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Records every call; `hang` makes each run hit its deadline.
#[derive(Default)]
struct FakeExecutor {
    commands: Mutex<Vec<String>>,
    timeouts: Mutex<Vec<Duration>>,
    hang: AtomicBool,
}

impl FakeExecutor {
    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, command: &str, timeout: Duration) -> Result<Execution, ServiceError> {
        self.commands.lock().unwrap().push(command.to_string());
        self.timeouts.lock().unwrap().push(timeout);
        if self.hang.load(Ordering::Relaxed) {
            return Ok(Execution::deadline_exceeded(timeout));
        }
        Ok(Execution::from_streams("22/tcp open ssh\n", ""))
    }
}

/// Cloning shares the recorded state with the runtime's copy.
#[derive(Clone, Default)]
struct FakeNetwork {
    saved: Rc<RefCell<Vec<SavedNetwork>>>,
    added: Rc<RefCell<Vec<(String, String)>>>,
}

impl NetworkStatusProvider for FakeNetwork {
    fn status(&self) -> Result<NetworkStatus, ServiceError> {
        Ok(NetworkStatus {
            connected: true,
            ssid: Some("lab".into()),
            ip: Some("10.0.0.7".into()),
            signal: Some("-50 dBm".into()),
        })
    }

    fn saved_networks(&self) -> Result<Vec<SavedNetwork>, ServiceError> {
        Ok(self.saved.borrow().clone())
    }

    fn add_network(&self, ssid: &str, secret: &str) -> Result<(), ServiceError> {
        self.added.borrow_mut().push((ssid.into(), secret.into()));
        Ok(())
    }
}

struct FakeSystem;

impl SystemInfoProvider for FakeSystem {
    fn snapshot(&self, panel: InfoPanel) -> Result<Vec<(String, String)>, ServiceError> {
        match panel {
            InfoPanel::Disk => Err(ServiceError::Unavailable("df failed".into())),
            _ => Ok(vec![("CPU Cores".into(), "4".into())]),
        }
    }
}

#[derive(Clone, Default)]
struct FakePower {
    called: Rc<Cell<bool>>,
}

impl PowerControl for FakePower {
    fn power_off(&self) -> Result<(), ServiceError> {
        self.called.set(true);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedClock(Rc<ManualClock>);

impl Clock for SharedClock {
    fn now_ms(&self) -> u64 {
        self.0.now_ms()
    }
}

// ---------------------------------------------------------------------------
// Rig
// ---------------------------------------------------------------------------

struct Rig<P: PanelDriver> {
    runtime: Runtime<P, ScriptedButtons, SharedClock>,
    clock: SharedClock,
    executor: Arc<FakeExecutor>,
    network: FakeNetwork,
    power: FakePower,
    config_path: std::path::PathBuf,
    _tmp: TempDir,
}

fn rig_with<P: PanelDriver>(panel: P) -> Rig<P> {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    let mut store = ConfigStore::load(config_path.clone());
    store
        .set(
            "system.results_directory",
            serde_json::json!(tmp.path().join("results").to_string_lossy()),
        )
        .unwrap();
    let config = store.shared();

    let executor = Arc::new(FakeExecutor::default());
    let network = FakeNetwork::default();
    let power = FakePower::default();
    let services = Services {
        tools: ToolRunner::new(executor.clone(), config),
        network: Box::new(network.clone()),
        system: Box::new(FakeSystem),
        power: Box::new(power.clone()),
    };

    let clock = SharedClock::default();
    let mut runtime = Runtime::new(panel, ScriptedButtons::new(), clock.clone(), services).unwrap();
    runtime.start();
    Rig {
        runtime,
        clock,
        executor,
        network,
        power,
        config_path,
        _tmp: tmp,
    }
}

fn rig() -> Rig<RecordingPanel> {
    rig_with(RecordingPanel::new())
}

impl<P: PanelDriver> Rig<P> {
    /// One tick per press.
    fn press(&mut self, buttons: &[Button]) {
        for b in buttons {
            self.runtime.buttons_mut().push_tick(&[*b]);
            self.runtime.tick();
        }
    }

    fn advance(&mut self, ms: u64) {
        self.clock.0.advance(ms);
        self.runtime.tick();
    }

    fn menu(&self) -> String {
        self.runtime.navigator().current().menu.clone()
    }

    fn buffer(&self) -> Option<String> {
        match self.runtime.controller().mode() {
            Mode::TextEntry { session, .. } => Some(session.buffer().to_string()),
            _ => None,
        }
    }
}

use Button::{Center, Down, Key1, Key2, Left, Right, Up};

/// main > Pentest Tools > Scan Timeout
const SCAN_TIMEOUT: [Button; 8] = [Right, Down, Down, Down, Down, Down, Down, Right];

/// Keyboard row 3 holds `5 6 7 8 9 0`; the cursor starts on `a`.
const TYPE_0: [Button; 9] = [Down, Down, Down, Right, Right, Right, Right, Right, Center];

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn test_start_paints_root_menu() {
    let r = rig();
    assert_eq!(r.runtime.display_mode(), DisplayMode::Display);
    let frames = r.runtime.panel().frames();
    assert_eq!(frames.len(), 1);
    let expected = compositor::render_menu(
        "Pen-Deck",
        &["Pentest Tools", "Network Settings", "System Info", "Power Off"],
        0,
        0,
    );
    assert!(frames[0] == expected);
}

#[test]
fn test_move_down_four_times_clamps_and_redraws() {
    let mut r = rig();
    r.press(&[Down, Down, Down, Down]);
    let at = r.runtime.navigator().current();
    assert_eq!(at.selected, 3);
    assert_eq!(at.scroll, 0);
    assert_eq!(r.runtime.navigator().selected_label(), Some("Power Off"));
    // start + one redraw per press
    assert_eq!(r.runtime.panel().frames().len(), 5);
}

#[test]
fn test_enter_and_back() {
    let mut r = rig();
    r.press(&[Right, Right]);
    assert_eq!(r.menu(), "nmap");
    assert_eq!(r.runtime.navigator().depth(), 2);
    r.press(&[Left]);
    assert_eq!(r.menu(), "pentest_tools");
    r.press(&[Key2, Key2]);
    assert_eq!(r.menu(), "main");
    assert!(r.runtime.navigator().at_root());
}

// ---------------------------------------------------------------------------
// Text entry
// ---------------------------------------------------------------------------

#[test]
fn test_typing_abc_runs_preset() {
    let mut r = rig();
    // main > Pentest Tools > Nmap > Quick Scan
    r.press(&[Right, Right, Right]);
    assert_eq!(r.buffer().as_deref(), Some(""));
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::TEXT_ENTRY);

    r.press(&[Center, Right, Center, Right, Center]);
    assert_eq!(r.buffer().as_deref(), Some("abc"));

    r.press(&[Key1]);
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::NAVIGATION);
    assert_eq!(r.executor.commands(), ["nmap -T4 -F abc"]);
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::text("Command Output", "22/tcp open ssh\n"))
    );
    assert_eq!(r.menu(), "nmap");
}

#[test]
fn test_cancel_restores_navigation_binding() {
    let mut r = rig();
    r.press(&[Right, Right, Right]);
    r.press(&[Center]);
    assert!(r.runtime.controller().is_modal());

    r.press(&[Key2]);
    assert!(!r.runtime.controller().is_modal());
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::NAVIGATION);
    assert!(!r.runtime.has_pending_flow());
    assert!(r.executor.commands().is_empty());
    assert!(r.runtime.result().is_none());
    assert_eq!(r.menu(), "nmap");
    assert_eq!(r.runtime.navigator().current().selected, 0);
}

#[test]
fn test_empty_input_aborts_flow() {
    let mut r = rig();
    // main > Pentest Tools > Custom Command
    r.press(&[Right, Down, Down, Down, Down, Right]);
    assert!(r.runtime.controller().is_modal());
    r.press(&[Key1]);
    assert!(!r.runtime.has_pending_flow());
    assert!(r.executor.commands().is_empty());
    assert!(r.runtime.result().is_none());
}

#[test]
fn test_add_network_two_step_flow() {
    let mut r = rig();
    // main > Network Settings > Add Network
    r.press(&[Down, Right, Down, Down, Right]);
    r.press(&[Center, Key1]);
    assert!(r.runtime.has_pending_flow());
    assert_eq!(r.buffer().as_deref(), Some(""));

    r.press(&[Right, Center, Key1]);
    assert_eq!(
        r.network.added.borrow().as_slice(),
        [("a".to_string(), "b".to_string())]
    );
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::text("Network Added", "Added: a"))
    );
}

#[test]
fn test_scan_timeout_rejects_text_then_asks_again() {
    let mut r = rig();
    r.press(&SCAN_TIMEOUT);
    assert_eq!(r.buffer().as_deref(), Some(""));

    r.press(&[Center, Key1]);
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::error("Please enter a valid number"))
    );
    assert!(r.runtime.has_pending_flow());
    assert!(!r.runtime.controller().is_modal());

    r.advance(STATUS_DWELL_MS);
    assert!(r.runtime.result().is_none());
    assert_eq!(r.buffer().as_deref(), Some(""));
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::TEXT_ENTRY);
}

#[test]
fn test_scan_timeout_below_minimum_is_rejected() {
    let mut r = rig();
    r.press(&SCAN_TIMEOUT);
    r.press(&TYPE_0);
    assert_eq!(r.buffer().as_deref(), Some("0"));

    r.press(&[Key1]);
    assert_eq!(r.runtime.result(), Some(&ResultView::error("Value must be >= 1")));
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&r.config_path).unwrap()).unwrap();
    assert_eq!(on_disk["advanced"]["scan_timeout_seconds"], 300);
}

#[test]
fn test_blank_scan_timeout_asks_again() {
    let mut r = rig();
    r.press(&SCAN_TIMEOUT);
    r.press(&[Key1]);
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::error("Please enter a valid number"))
    );
    r.advance(STATUS_DWELL_MS);
    assert!(r.runtime.controller().is_modal());
}

#[test]
fn test_scan_timeout_cancel_after_retry_aborts() {
    let mut r = rig();
    r.press(&SCAN_TIMEOUT);
    r.press(&[Center, Key1]);
    r.advance(STATUS_DWELL_MS);
    assert!(r.runtime.controller().is_modal());

    r.press(&[Key2]);
    assert!(!r.runtime.controller().is_modal());
    assert!(!r.runtime.has_pending_flow());
    assert!(r.runtime.result().is_none());
    assert_eq!(r.menu(), "pentest_tools");
}

#[test]
fn test_scan_timeout_bounds_later_runs() {
    let mut r = rig();
    r.press(&SCAN_TIMEOUT);
    // "50"
    r.press(&[Down, Down, Down, Center]);
    r.press(&TYPE_0[3..]);
    assert_eq!(r.buffer().as_deref(), Some("50"));

    r.press(&[Key1]);
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::text("Scan Timeout", "Timeout: 50s"))
    );
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&r.config_path).unwrap()).unwrap();
    assert_eq!(on_disk["advanced"]["scan_timeout_seconds"], 50);

    r.advance(TEXT_DWELL_MS);
    // back up to Nmap > Quick Scan
    r.press(&[Up, Up, Up, Up, Up, Up, Right, Right, Center, Key1]);
    assert_eq!(r.executor.commands(), ["nmap -T4 -F a"]);
    assert_eq!(r.executor.timeouts(), [Duration::from_secs(50)]);
}

// ---------------------------------------------------------------------------
// Leaves and result screens
// ---------------------------------------------------------------------------

#[test]
fn test_failed_leaf_leaves_stack_unchanged() {
    let mut r = rig();
    // main > System Info > Disk Usage
    r.press(&[Down, Down, Right, Down, Down]);
    let before = r.runtime.navigator().current().clone();
    let depth = r.runtime.navigator().depth();

    r.press(&[Right]);
    assert_eq!(r.runtime.result(), Some(&ResultView::error("df failed")));
    assert_eq!(r.runtime.navigator().current(), &before);
    assert_eq!(r.runtime.navigator().depth(), depth);
}

#[test]
fn test_timed_out_run_reports_deadline_and_keeps_stack() {
    let mut r = rig();
    r.executor.hang.store(true, Ordering::Relaxed);
    r.press(&[Right, Right, Right]);
    let before = r.runtime.navigator().current().clone();
    let depth = r.runtime.navigator().depth();

    r.press(&[Center, Key1]);
    assert_eq!(r.executor.timeouts(), [Duration::from_secs(300)]);
    let view = r.runtime.result().unwrap();
    assert_eq!(view.screen(), Screen::Text);
    match view {
        ResultView::Text { title, body } => {
            assert_eq!(title, "Command Output");
            assert_eq!(body, "Error: Command timed out after 300 seconds");
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(r.runtime.navigator().current(), &before);
    assert_eq!(r.runtime.navigator().depth(), depth);

    r.advance(4_999);
    assert!(r.runtime.result().is_some());
    r.advance(1);
    assert!(r.runtime.result().is_none());
    assert!(!r.runtime.controller().is_modal());
    assert_eq!(r.menu(), "nmap");
}

#[test]
fn test_result_discards_presses_until_dwell_expires() {
    let mut r = rig();
    // main > System Info > Hardware Info
    r.press(&[Down, Down, Right, Right]);
    assert_eq!(r.runtime.result().map(ResultView::title), Some("Hardware"));

    r.press(&[Left]);
    assert_eq!(r.menu(), "system_info");
    assert!(r.runtime.result().is_some());

    r.advance(2_999);
    assert!(r.runtime.result().is_some());
    r.advance(1);
    assert!(r.runtime.result().is_none());

    r.press(&[Left]);
    assert_eq!(r.menu(), "main");
}

#[test]
fn test_view_results_after_a_run() {
    let mut r = rig();
    r.press(&[Right, Right, Right, Center, Key1]);
    r.advance(5_000);
    r.press(&[Left]);
    // Pentest Tools > View Results
    r.press(&[Down, Down, Down, Down, Down, Right]);
    match r.runtime.result() {
        Some(ResultView::Text { title, body }) => {
            assert_eq!(title, "Recent Results");
            assert!(body.starts_with("nmap_quick_scan_"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_saved_networks_choice() {
    let mut r = rig();
    r.network.saved.borrow_mut().extend([
        SavedNetwork {
            ssid: "home".into(),
            priority: 5,
        },
        SavedNetwork {
            ssid: "lab".into(),
            priority: 1,
        },
    ]);
    r.press(&[Down, Right, Down, Right]);
    assert!(matches!(r.runtime.controller().mode(), Mode::Choice { .. }));
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::CHOICE);

    r.press(&[Down, Center]);
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::NAVIGATION);
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::status(
            "Saved Network",
            vec![
                ("SSID".to_string(), "lab".to_string()),
                ("Priority".to_string(), "1".to_string()),
            ],
        ))
    );
}

#[test]
fn test_no_saved_networks() {
    let mut r = rig();
    r.press(&[Down, Right, Down, Right]);
    assert!(!r.runtime.controller().is_modal());
    assert_eq!(
        r.runtime.result(),
        Some(&ResultView::text("Saved Networks", "No saved networks"))
    );
}

#[test]
fn test_power_off() {
    let mut r = rig();
    r.press(&[Down, Down, Down, Right]);
    assert!(r.power.called.get());
    assert_eq!(r.runtime.result().map(ResultView::title), Some("Power Off"));
}

// ---------------------------------------------------------------------------
// Headless
// ---------------------------------------------------------------------------

#[test]
fn test_paint_failure_switches_to_headless() {
    let mut r = rig_with(RecordingPanel::failing_after(1));
    assert_eq!(r.runtime.display_mode(), DisplayMode::Display);

    r.press(&[Down]);
    assert_eq!(r.runtime.display_mode(), DisplayMode::Headless);
    assert_eq!(r.runtime.panel().frames().len(), 1);

    // navigation keeps working without a panel
    r.press(&[Down]);
    assert_eq!(r.runtime.navigator().current().selected, 2);
}

#[test]
fn test_headless_text_request_resolves_to_no_value() {
    let mut r = rig_with(NoPanel);
    assert_eq!(r.runtime.display_mode(), DisplayMode::Headless);

    r.press(&[Right, Right, Right]);
    assert!(!r.runtime.controller().is_modal());
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::NAVIGATION);
    assert!(!r.runtime.has_pending_flow());
    assert!(r.executor.commands().is_empty());
}

#[test]
fn test_paint_failure_during_text_entry_cancels_it() {
    // start + pentest_tools + nmap + keyboard frames succeed
    let mut r = rig_with(RecordingPanel::failing_after(4));
    r.press(&[Right, Right, Right]);
    assert!(r.runtime.controller().is_modal());

    r.press(&[Center]);
    assert_eq!(r.runtime.display_mode(), DisplayMode::Headless);
    assert!(!r.runtime.controller().is_modal());
    assert_eq!(*r.runtime.controller().binding(), ButtonBinding::NAVIGATION);
    assert!(!r.runtime.has_pending_flow());
}

#[test]
fn test_shutdown_blanks_panel_and_backlight() {
    let mut r = rig();
    assert!(r.runtime.panel().backlight_on());
    r.runtime.shutdown();
    let last = r.runtime.panel().last_frame().unwrap();
    assert!(last.pixels().iter().all(|p| *p == Rgb888::BLACK));
    assert!(!r.runtime.panel().backlight_on());
}

#[test]
fn test_idle_tick_is_quiet() {
    let mut r = rig();
    let painted = r.runtime.panel().frames().len();
    r.runtime.tick();
    r.runtime.tick();
    assert_eq!(r.runtime.panel().frames().len(), painted);
    assert!(r.runtime.buttons_mut().poll().is_empty());
}
