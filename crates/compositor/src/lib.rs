//! compositor - screen rendering for the Pen-Deck panel
//!
//! Turns UI state into a fresh [`PixelBuffer`] for every redraw. Each
//! screen has two entry points:
//!
//! - `draw_*` renders onto any `DrawTarget<Color = Rgb888>`
//! - `render_*` allocates a 128×128 buffer, draws, and returns it
//!
//! Rendering is pure: no clock, no randomness, no I/O. The same state always
//! yields the same buffer, which is what the visual tests rely on.
//!
//! [`PixelBuffer`]: platform::PixelBuffer

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

extern crate alloc;

pub mod draw;
pub mod render;
pub mod theme;

pub use render::{
    draw_choice, draw_menu, draw_splash, draw_status, draw_text, draw_text_entry, render_choice,
    render_menu, render_result, render_splash, render_status, render_text, render_text_entry,
};
