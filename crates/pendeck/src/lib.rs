//! Pen-Deck device runtime
//!
//! A pocket pentest companion for a Raspberry Pi with a 1.44" 128×128
//! ST7735S LCD HAT and eight buttons.
//!
//! # Architecture
//!
//! ```text
//! main.rs (launcher)
//!         ↓
//! runtime (tick loop, pending flows, result screens)
//!         ↓                    ↓
//! ui + compositor          services (tools, network, sysinfo, power)
//!         ↓                    ↓
//! platform traits          config store, sh -c executor
//!         ↓
//! display (ST7735S) + hal (spidev, sysfs GPIO)
//! ```
//!
//! # Features
//!
//! - `hardware` - open `/dev/spidev0.0` and the HAT's GPIO lines through
//!   `linux-embedded-hal`. Without it the launcher runs headless.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock;
pub mod config;
pub mod display;
pub mod hal;
pub mod logging;
pub mod menus;
pub mod runtime;
pub mod services;

pub use clock::MonotonicClock;
pub use config::{ConfigError, ConfigStore, SharedConfig};
pub use display::St7735s;
pub use hal::HardwareError;
pub use menus::{catalog, Action};
pub use runtime::{DisplayMode, Runtime};
pub use services::{ServiceError, Services};
