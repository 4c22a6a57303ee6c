//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured `system.log_level`
//! applies to the Pen-Deck crates.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Map a configured level name to a `tracing` filter directive.
///
/// Unknown names fall back to `info`.
pub fn directive_for(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Build the filter for `level` unless `RUST_LOG` is set.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let lvl = directive_for(level);
        EnvFilter::new(format!("pendeck={lvl},compositor={lvl},warn"))
    })
}

/// Swaps the active filter once the configured level is known.
pub struct LogLevel {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevel {
    /// Apply `level` (or `RUST_LOG`) from here on.
    pub fn apply(&self, level: &str) {
        if let Err(e) = self.handle.reload(filter_for(level)) {
            tracing::debug!("log level unchanged: {e}");
        }
    }
}

fn layered(level: &str) -> (impl tracing::Subscriber + Send + Sync + 'static, LogLevel) {
    let (filter, handle) = reload::Layer::new(filter_for(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false));
    (subscriber, LogLevel { handle })
}

/// Install the global fmt subscriber at `level`. Safe to call more than
/// once; later calls are ignored, but each returned handle still adjusts
/// its own filter.
pub fn init(level: &str) -> LogLevel {
    let (subscriber, log) = layered(level);
    let _ = subscriber.try_init();
    log
}
