//! Device configuration and constants
//!
//! Central values for the Waveshare 1.44" LCD HAT on a Raspberry Pi.
//! Everything that touches a pin number, a panel dimension or a timing
//! budget should reference these constants rather than hardcoding values.

/// The application name (shown in the root menu title bar)
pub const APP_NAME: &str = "Pen-Deck";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Panel width in pixels
pub const PANEL_WIDTH: u32 = 128;

/// Panel height in pixels
pub const PANEL_HEIGHT: u32 = 128;

/// Column offset of the visible area inside the controller RAM
pub const PANEL_X_OFFSET: u8 = 2;

/// Row offset of the visible area inside the controller RAM
pub const PANEL_Y_OFFSET: u8 = 1;

/// Panel SPI clock (Hz)
pub const PANEL_SPI_HZ: u32 = 9_000_000;

/// BCM pin numbers for the panel control lines
pub mod panel_pins {
    /// Reset (active low)
    pub const RST: u32 = 27;
    /// Data/command select
    pub const DC: u32 = 25;
    /// Chip select (driven by spidev as CE0)
    pub const CS: u32 = 8;
    /// Backlight enable
    pub const BL: u32 = 24;
}

/// BCM pin numbers for the eight buttons, in [`crate::Button::ALL`] order
pub const BUTTON_PINS: [u32; 8] = [6, 19, 5, 26, 13, 21, 20, 16];

/// Quiet window after a reported press during which the same button is ignored
pub const DEBOUNCE_MS: u64 = 200;

/// UI tick cadence (20 Hz)
pub const TICK_MS: u64 = 50;

/// Menu rows visible at once
pub const VISIBLE_ROWS: usize = 6;
