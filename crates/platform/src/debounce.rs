//! Per-button debounce and edge detection
//!
//! Two small pieces shared by every button source:
//!
//! - [`EdgeDetector`] turns sampled line levels into released→pressed
//!   transitions. Releases are never surfaced.
//! - [`Debouncer`] suppresses repeat presses of the *same* button for a
//!   quiet window after a reported press. Each button has its own timer.

use crate::config::DEBOUNCE_MS;
use crate::input::Button;

/// Per-button quiet-window filter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    last_reported: [Option<u64>; 8],
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

impl Debouncer {
    /// Create a debouncer with the given quiet window.
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_reported: [None; 8],
        }
    }

    /// Quiet window in milliseconds
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Decide whether a press of `button` at `now_ms` should be reported.
    ///
    /// Reported iff no press of `button` was reported in
    /// `(now_ms - window, now_ms]`. Suppressed presses do not restart the
    /// window.
    pub fn accept(&mut self, button: Button, now_ms: u64) -> bool {
        let Some(slot) = self.last_reported.get_mut(button.index()) else {
            return false;
        };
        let quiet = match *slot {
            Some(last) => now_ms.saturating_sub(last) >= self.window_ms,
            None => true,
        };
        if quiet {
            *slot = Some(now_ms);
        }
        quiet
    }

    /// Forget all timers.
    pub fn reset(&mut self) {
        self.last_reported = [None; 8];
    }
}

/// Falling-edge (released → pressed) detector over eight lines.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    pressed: [bool; 8],
}

impl EdgeDetector {
    /// Create a detector that assumes every line starts released.
    pub const fn new() -> Self {
        Self { pressed: [false; 8] }
    }

    /// Record the current level of `button`; true if it just went down.
    pub fn update(&mut self, button: Button, is_pressed: bool) -> bool {
        let Some(prev) = self.pressed.get_mut(button.index()) else {
            return false;
        };
        let edge = is_pressed && !*prev;
        *prev = is_pressed;
        edge
    }
}
