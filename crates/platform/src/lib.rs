//! Hardware seams for the Pen-Deck handheld
//!
//! This crate provides trait-based abstractions for the two pieces of
//! hardware the UI runtime owns, so the runtime can be developed and tested
//! without a Raspberry Pi or the Waveshare 1.44" HAT attached.
//!
//! # Architecture Layers
//!
//! ```text
//! Runtime (pendeck crate)
//!         ↓
//! UI state (ui crate) + Compositor (compositor crate)
//!         ↓
//! Platform seams (this crate - traits, pixel buffer, debounce)
//!         ↓
//! Linux userspace HAL (spidev + sysfs GPIO)
//! ```
//!
//! # Abstractions
//!
//! - [`PanelDriver`] - initialize the panel and paint whole frames
//! - [`ButtonSource`] - one `poll()` per tick, whatever backs it
//! - [`PixelBuffer`] - 24-bit RGB frame, an `embedded-graphics` draw target
//! - [`Debouncer`] - per-button quiet window
//!
//! # Features
//!
//! - `std`: channel-backed [`QueuedButtons`] for interrupt callbacks

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

extern crate alloc;

pub mod color;
pub mod config;
pub mod debounce;
pub mod display;
pub mod framebuffer;
pub mod gpio;
pub mod input;
pub mod peripheral;

#[cfg(feature = "std")]
pub mod queue;

pub mod mocks;

pub use color::{pack_rgb565, unpack_rgb565};
pub use debounce::{Debouncer, EdgeDetector};
pub use display::{PanelDriver, PanelError};
pub use framebuffer::PixelBuffer;
pub use gpio::GpioButtons;
pub use input::{Button, ButtonSource, Clock, NoButtons, Presses};
pub use peripheral::{BitOrder, SpiConfig, SpiMode};

#[cfg(feature = "std")]
pub use queue::{ButtonQueue, EdgeSender, QueuedButtons};
