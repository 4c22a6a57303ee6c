//! Pen-Deck launcher.
//!
//! ```bash
//! cargo run -p pendeck                      # headless, logs the screens
//! cargo run -p pendeck --features hardware  # on the Pi with the LCD HAT
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use platform::{ButtonSource, NoButtons, PanelDriver};

use pendeck::config::{ConfigStore, SharedConfig};
use pendeck::display::NoPanel;
use pendeck::services::{
    CommandExecutor, ProcSystemInfo, Services, ShellExecutor, SystemNetwork, SystemPower,
    ToolRunner,
};
use pendeck::{logging, MonotonicClock, Runtime};

fn main() -> Result<()> {
    // Subscriber first so config load diagnostics are not lost; the
    // configured level takes over once the file is read.
    let log = logging::init("INFO");
    let store = ConfigStore::from_env();
    log.apply(&store.log_level());
    tracing::info!("config: {}", store.path().display());

    let results = store.results_dir();
    std::fs::create_dir_all(&results)
        .with_context(|| format!("creating results directory {}", results.display()))?;

    let config = store.shared();
    let services = build_services(&config)?;
    let shutdown = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(Arc::clone(&shutdown))?;

    #[cfg(feature = "hardware")]
    {
        use pendeck::hal::linux;
        match linux::open_panel() {
            Ok(panel) => {
                return match linux::open_buttons(MonotonicClock::new()) {
                    Ok(buttons) => run_ui(panel, buttons, services, &shutdown),
                    Err(e) => {
                        tracing::warn!("buttons unavailable ({e}); no input");
                        run_ui(panel, NoButtons, services, &shutdown)
                    }
                };
            }
            Err(e) => tracing::warn!("display hardware unavailable ({e}); running headless"),
        }
    }

    run_ui(NoPanel, NoButtons, services, &shutdown)
}

fn build_services(config: &SharedConfig) -> Result<Services> {
    let executor: Arc<dyn CommandExecutor> =
        Arc::new(ShellExecutor::new().context("starting command executor")?);
    Ok(Services {
        tools: ToolRunner::new(Arc::clone(&executor), Arc::clone(config)),
        network: Box::new(SystemNetwork::new(Arc::clone(&executor), Arc::clone(config))),
        system: Box::new(ProcSystemInfo::new(Arc::clone(&executor))),
        power: Box::new(SystemPower::new(executor)),
    })
}

fn run_ui<P, B>(panel: P, buttons: B, services: Services, shutdown: &AtomicBool) -> Result<()>
where
    P: PanelDriver,
    B: ButtonSource,
{
    let mut runtime = Runtime::new(panel, buttons, MonotonicClock::new(), services)
        .map_err(|e| anyhow::anyhow!("menu catalog invalid: {e}"))?;
    runtime.splash();
    runtime.run(shutdown);
    runtime.shutdown();
    tracing::info!("goodbye");
    Ok(())
}

/// Set `flag` on Ctrl-C / SIGINT.
fn watch_ctrl_c(flag: Arc<AtomicBool>) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting signal runtime")?;
    std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            rt.block_on(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("cannot listen for Ctrl-C: {e}");
                    return;
                }
                tracing::info!("shutdown requested");
                flag.store(true, Ordering::Relaxed);
            });
        })
        .context("spawning signal thread")?;
    Ok(())
}
