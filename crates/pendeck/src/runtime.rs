//! The cooperative UI runtime.
//!
//! One thread, one loop. Each [`Runtime::tick`]:
//!
//! ```text
//! expire result screen ──► poll buttons ──► controller.handle(press)
//!                                               │
//!            ┌──────────────┬───────────────────┼─────────────────┐
//!            ▼              ▼                   ▼                 ▼
//!      Nav(Move/Back)   Nav(Activate)     Text(result)      Choice(result)
//!      navigator         leaf / input      resume pending    resume pending
//!            └──────────────┴───────── redraw ──┴─────────────────┘
//! ```
//!
//! Every mutation ends in a full-frame redraw. When the panel fails the
//! runtime drops to headless mode for good and echoes screens to the log
//! instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use platform::config::{APP_VERSION, TICK_MS};
use platform::{Button, ButtonSource, Clock, PanelDriver, PixelBuffer};
use ui::{
    Activation, InputController, Mode, NavCommand, NavError, Navigator, Outcome, ResultView,
    TextRequest,
};

use crate::menus::{catalog, Action};
use crate::services::tools::RECENT_RESULTS_LIMIT;
use crate::services::{InfoPanel, SavedNetwork, ServiceError, Services, ToolRun};

/// Whether frames reach a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Panel initialized and accepting frames
    Display,
    /// No panel; screens go to the log
    Headless,
}

/// A multi-step action waiting on modal input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Flow {
    Target { tool: String, preset: String },
    Command { tool: String },
    Ssid,
    Password { ssid: String },
    ScanTimeout { request: TextRequest },
    SavedNetwork { networks: Vec<SavedNetwork> },
}

#[derive(Debug)]
struct Shown {
    view: ResultView,
    until_ms: u64,
}

/// Owns the panel, the buttons and all UI state.
pub struct Runtime<P, B, C> {
    panel: P,
    buttons: B,
    clock: C,
    navigator: Navigator<Action>,
    controller: InputController,
    services: Services,
    display: DisplayMode,
    pending: Option<Flow>,
    result: Option<Shown>,
    /// Asked again once the current result screen expires
    reprompt: Option<TextRequest>,
}

impl<P, B, C> Runtime<P, B, C>
where
    P: PanelDriver,
    B: ButtonSource,
    C: Clock,
{
    /// Initialize `panel` and build the runtime at the root menu.
    ///
    /// A panel that fails to initialize is not an error: the runtime starts
    /// headless.
    pub fn new(mut panel: P, buttons: B, clock: C, services: Services) -> Result<Self, NavError> {
        let navigator = Navigator::new(catalog())?;
        let display = match panel.initialize() {
            Ok(()) => {
                tracing::info!("display initialized");
                DisplayMode::Display
            }
            Err(e) => {
                tracing::warn!("display unavailable ({e}); running headless");
                DisplayMode::Headless
            }
        };
        Ok(Self {
            panel,
            buttons,
            clock,
            navigator,
            controller: InputController::default(),
            services,
            display,
            pending: None,
            result: None,
            reprompt: None,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The panel driver
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// The button source, e.g. to script presses
    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    /// Menu navigation state
    pub fn navigator(&self) -> &Navigator<Action> {
        &self.navigator
    }

    /// Mode controller
    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    /// Current display mode
    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    /// Result screen currently shown, if any
    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref().map(|s| &s.view)
    }

    /// Whether a multi-step action is waiting on input
    pub fn has_pending_flow(&self) -> bool {
        self.pending.is_some()
    }

    fn display_available(&self) -> bool {
        self.display == DisplayMode::Display
    }

    // -----------------------------------------------------------------------
    // Loop
    // -----------------------------------------------------------------------

    /// Show the boot splash.
    pub fn splash(&mut self) {
        tracing::info!("Pen-Deck v{APP_VERSION}");
        self.paint(compositor::render_splash(APP_VERSION));
    }

    /// Draw the first menu.
    pub fn start(&mut self) {
        tracing::info!("UI started ({:?})", self.display);
        self.redraw();
    }

    /// One scheduler step.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        if self.result.as_ref().is_some_and(|s| now >= s.until_ms) {
            self.result = None;
            match self.reprompt.take() {
                Some(request) => self.prompt(request),
                None => self.redraw(),
            }
        }
        for button in self.buttons.poll() {
            self.handle_press(button);
        }
    }

    /// Tick every [`TICK_MS`] until `shutdown` is set.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        self.start();
        while !shutdown.load(Ordering::Relaxed) {
            self.tick();
            std::thread::sleep(Duration::from_millis(TICK_MS));
        }
        tracing::info!("UI loop stopped");
    }

    /// Blank the panel and switch the backlight off. Best effort.
    pub fn shutdown(&mut self) {
        if !self.display_available() {
            return;
        }
        let size = self.panel.size();
        let black = PixelBuffer::new(size.width, size.height, Rgb888::BLACK);
        if let Err(e) = self.panel.paint(black) {
            tracing::debug!("final clear failed: {e}");
        }
        if let Err(e) = self.panel.set_backlight(false) {
            tracing::debug!("backlight off failed: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Feed one press through the active binding.
    pub fn handle_press(&mut self, button: Button) {
        if self.result.is_some() {
            tracing::debug!("press {} discarded (result screen)", button.name());
            return;
        }
        tracing::debug!("press {}", button.name());
        match self.controller.handle(button) {
            Outcome::Nav(command) => self.navigate(command),
            Outcome::Redraw => self.redraw(),
            Outcome::Text(text) => self.resume_text(text),
            Outcome::Choice(picked) => self.resume_choice(picked),
            Outcome::Ignored => {}
        }
    }

    fn navigate(&mut self, command: NavCommand) {
        match command {
            NavCommand::Move(delta) => {
                self.navigator.move_by(delta);
                self.redraw();
            }
            NavCommand::Back => {
                if self.navigator.back() {
                    self.redraw();
                }
            }
            NavCommand::Activate => self.activate(),
            NavCommand::Refresh => self.redraw(),
        }
    }

    fn activate(&mut self) {
        match self.navigator.activate() {
            Ok(Activation::Entered(menu)) => {
                tracing::debug!("entered {menu}");
                self.redraw();
            }
            Ok(Activation::Input(request, action)) => self.begin_flow(request, action),
            Ok(Activation::Action(action)) => self.run_action(action),
            Ok(Activation::Unbound) => {
                tracing::debug!("{:?} is not wired", self.navigator.selected_label());
            }
            Err(e) => {
                tracing::warn!("navigation failed: {e}");
                self.show_result(ResultView::error(&e.to_string()));
            }
        }
    }

    fn begin_flow(&mut self, request: TextRequest, action: Action) {
        let flow = match action {
            Action::RunPreset { tool, preset } => Flow::Target { tool, preset },
            Action::RunCustom { tool } => Flow::Command { tool },
            Action::AddNetwork => Flow::Ssid,
            Action::SetScanTimeout => Flow::ScanTimeout {
                request: request.clone(),
            },
            other => return self.run_action(other),
        };
        self.pending = Some(flow);
        self.prompt(request);
    }

    fn prompt(&mut self, request: TextRequest) {
        tracing::info!("text entry: {}", request.title());
        match self.controller.begin_text(request, self.display_available()) {
            Ok(Outcome::Text(text)) => self.resume_text(text),
            Ok(_) => self.redraw(),
            Err(e) => {
                tracing::warn!("{e}");
                self.pending = None;
            }
        }
    }

    fn resume_text(&mut self, text: Option<String>) {
        let Some(flow) = self.pending.take() else {
            self.redraw();
            return;
        };
        // Blank free text aborts; a blank number is asked for again.
        let numeric = matches!(flow, Flow::ScanTimeout { .. });
        let Some(text) = text.filter(|t| numeric || !t.trim().is_empty()) else {
            tracing::debug!("input abandoned");
            self.redraw();
            return;
        };

        match flow {
            Flow::Target { tool, preset } => {
                self.busy(&format!("{tool} {preset}\n{text}"));
                let run = self.services.tools.run_preset(&tool, &preset, &text);
                self.show_tool_run(run);
            }
            Flow::Command { tool } => {
                self.busy(&text);
                let run = self.services.tools.run_custom(&tool, &text);
                self.show_tool_run(run);
            }
            Flow::Ssid => {
                self.pending = Some(Flow::Password { ssid: text });
                self.prompt(TextRequest::new("Network Password", "Enter password:"));
            }
            Flow::Password { ssid } => {
                let saved = self.services.network.add_network(&ssid, &text);
                self.show_outcome(saved.map(|()| ResultView::text("Network Added", &format!("Added: {ssid}"))));
            }
            Flow::ScanTimeout { request } => {
                let bounds = request.bounds().unwrap_or_default();
                match bounds.parse(&text) {
                    Ok(value) => {
                        let seconds = whole_seconds(value);
                        let saved = self.services.tools.set_scan_timeout(seconds);
                        self.show_outcome(
                            saved.map(|()| ResultView::text("Scan Timeout", &format!("Timeout: {seconds}s"))),
                        );
                    }
                    Err(e) => {
                        tracing::debug!("rejected {text:?}: {e}");
                        self.pending = Some(Flow::ScanTimeout {
                            request: request.clone(),
                        });
                        self.reprompt = Some(request);
                        self.show_result(ResultView::error(&e.to_string()));
                    }
                }
            }
            Flow::SavedNetwork { .. } => self.redraw(),
        }
    }

    fn resume_choice(&mut self, picked: Option<usize>) {
        let Some(Flow::SavedNetwork { networks }) = self.pending.take() else {
            self.redraw();
            return;
        };
        match picked.and_then(|i| networks.get(i)) {
            Some(network) => self.show_result(ResultView::status(
                "Saved Network",
                vec![
                    ("SSID".to_string(), network.ssid.clone()),
                    ("Priority".to_string(), network.priority.to_string()),
                ],
            )),
            None => self.redraw(),
        }
    }

    fn run_action(&mut self, action: Action) {
        tracing::info!("action {action:?}");
        match action {
            Action::ViewResults => {
                let names = self.services.tools.recent_results(RECENT_RESULTS_LIMIT);
                self.show_outcome(names.map(|names| {
                    if names.is_empty() {
                        ResultView::text("Results", "No results found")
                    } else {
                        ResultView::text("Recent Results", &names.join("\n"))
                    }
                }));
            }
            Action::NetworkStatus => {
                let status = self.services.network.status();
                self.show_outcome(status.map(|s| ResultView::status("Network Status", s.to_pairs())));
            }
            Action::SavedNetworks => self.saved_networks(),
            Action::SystemInfo(panel) => {
                let rows = self.services.system.snapshot(panel);
                self.show_outcome(rows.map(|rows| info_view(panel, rows)));
            }
            Action::PowerOff => {
                self.show_result(ResultView::text("Power Off", "Shutting down..."));
                if let Err(e) = self.services.power.power_off() {
                    tracing::error!("{e}");
                    self.show_result(ResultView::error(&e.to_string()));
                }
            }
            other @ (Action::RunPreset { .. }
            | Action::RunCustom { .. }
            | Action::AddNetwork
            | Action::SetScanTimeout) => {
                tracing::warn!("{other:?} needs text input");
            }
        }
    }

    fn saved_networks(&mut self) {
        let networks = match self.services.network.saved_networks() {
            Ok(n) => n,
            Err(e) => return self.show_outcome(Err(e)),
        };
        if networks.is_empty() {
            return self.show_result(ResultView::text("Saved Networks", "No saved networks"));
        }
        if !self.display_available() {
            let list: Vec<&str> = networks.iter().map(|n| n.ssid.as_str()).collect();
            return self.show_result(ResultView::text("Saved Networks", &list.join("\n")));
        }

        let ssids = networks.iter().map(|n| n.ssid.clone()).collect();
        self.pending = Some(Flow::SavedNetwork { networks });
        match self.controller.begin_choice("Saved Networks", ssids, true) {
            Ok(Outcome::Choice(picked)) => self.resume_choice(picked),
            Ok(_) => self.redraw(),
            Err(e) => {
                tracing::warn!("{e}");
                self.pending = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    fn show_tool_run(&mut self, run: Result<ToolRun, ServiceError>) {
        self.show_outcome(run.map(|run| {
            if run.timed_out {
                tracing::warn!("tool run hit its deadline");
            }
            ResultView::text("Command Output", &run.output)
        }));
    }

    fn show_outcome(&mut self, outcome: Result<ResultView, ServiceError>) {
        match outcome {
            Ok(view) => self.show_result(view),
            Err(e) => {
                tracing::error!("{e}");
                self.show_result(ResultView::error(&e.to_string()));
            }
        }
    }

    /// Put a transient result on screen until its dwell time passes.
    fn show_result(&mut self, view: ResultView) {
        let until_ms = self.clock.now_ms().saturating_add(view.dwell_ms());
        self.result = Some(Shown { view, until_ms });
        self.redraw();
    }

    /// Paint a "please wait" frame before a blocking command.
    fn busy(&mut self, detail: &str) {
        if self.display_available() {
            self.paint(compositor::render_text("Running", &format!("{detail}\n\nPlease wait...")));
        } else {
            tracing::info!("running: {detail}");
        }
    }

    /// Render whatever is current: a result, a modal screen or the menu.
    pub fn redraw(&mut self) {
        if !self.display_available() {
            self.echo();
            return;
        }
        let frame = if let Some(shown) = &self.result {
            compositor::render_result(&shown.view)
        } else {
            match self.controller.mode() {
                Mode::Navigation => {
                    let Some(menu) = self.navigator.menu() else {
                        return;
                    };
                    let at = self.navigator.current();
                    compositor::render_menu(menu.title(), menu.items(), at.selected, at.scroll)
                }
                Mode::TextEntry { request, session, .. } => compositor::render_text_entry(
                    request.title(),
                    request.prompt(),
                    session.buffer(),
                    session.cursor(),
                    session.layout(),
                ),
                Mode::Choice { session, .. } => {
                    compositor::render_choice(session.title(), session.candidates(), session.selected())
                }
            }
        };
        tracing::debug!("redraw");
        self.paint(frame);
    }

    fn paint(&mut self, frame: PixelBuffer) {
        if !self.display_available() {
            return;
        }
        if let Err(e) = self.panel.paint(frame) {
            tracing::warn!("panel write failed ({e}); continuing headless");
            self.display = DisplayMode::Headless;
            if self.controller.is_modal() {
                let _ = self.controller.cancel();
                self.pending = None;
            }
            self.reprompt = None;
            self.echo();
        }
    }

    /// Text console for headless mode.
    fn echo(&self) {
        if let Some(shown) = &self.result {
            match &shown.view {
                ResultView::Status { title, pairs } => {
                    tracing::info!("[{title}]");
                    for (key, value) in pairs {
                        tracing::info!("  {key}: {value}");
                    }
                }
                ResultView::Text { title, body } => {
                    tracing::info!("[{title}]");
                    for line in body.lines() {
                        tracing::info!("  {line}");
                    }
                }
                ResultView::Error { body } => tracing::warn!("[{}] {body}", shown.view.title()),
            }
            return;
        }
        if let Some(menu) = self.navigator.menu() {
            let at = self.navigator.current();
            tracing::info!(
                "[{}] > {} ({}/{})",
                menu.title(),
                self.navigator.selected_label().unwrap_or(""),
                at.selected.saturating_add(1),
                menu.len()
            );
        }
    }
}

/// Round to whole seconds. Callers have already bounded `value` to 1..=3600.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(value: f64) -> u64 {
    value.round().max(1.0) as u64
}

fn info_view(panel: InfoPanel, rows: Vec<(String, String)>) -> ResultView {
    match panel {
        InfoPanel::Processes => {
            let lines: Vec<String> = rows.iter().map(|(k, v)| format!("{k} {v}")).collect();
            ResultView::text(panel.title(), &lines.join("\n"))
        }
        _ => ResultView::status(panel.title(), rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processes_panel_is_text() {
        let view = info_view(
            InfoPanel::Processes,
            vec![("1 init".into(), "0.1%".into()), ("2 sh".into(), "0.0%".into())],
        );
        assert_eq!(view, ResultView::text("Processes", "1 init 0.1%\n2 sh 0.0%"));
    }

    #[test]
    fn test_whole_seconds_rounds() {
        assert_eq!(whole_seconds(2.4), 2);
        assert_eq!(whole_seconds(2.5), 3);
        assert_eq!(whole_seconds(1.0), 1);
    }

    #[test]
    fn test_hardware_panel_is_status() {
        let view = info_view(InfoPanel::Hardware, vec![("Load".into(), "0.1".into())]);
        assert_eq!(view.title(), "Hardware");
        assert_eq!(view.screen(), ui::Screen::Status);
    }
}
