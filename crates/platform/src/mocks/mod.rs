//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests across the workspace.

#![cfg(any(test, feature = "std"))]

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_graphics::prelude::Size;

use crate::config::{PANEL_HEIGHT, PANEL_WIDTH};
use crate::{Button, ButtonSource, Clock, PanelDriver, PanelError, PixelBuffer, Presses};

/// Clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Create a clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Button source replaying a fixed script, one batch per poll.
#[derive(Debug, Default)]
pub struct ScriptedButtons {
    ticks: VecDeque<Presses>,
}

impl ScriptedButtons {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// One press per tick, in order
    pub fn presses(buttons: &[Button]) -> Self {
        let mut script = Self::new();
        for b in buttons {
            script.push_tick(&[*b]);
        }
        script
    }

    /// Queue a tick with the given presses
    pub fn push_tick(&mut self, buttons: &[Button]) {
        self.ticks.push_back(buttons.iter().copied().collect());
    }

    /// Ticks not yet consumed
    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl ButtonSource for ScriptedButtons {
    fn poll(&mut self) -> Presses {
        self.ticks.pop_front().unwrap_or_default()
    }
}

/// Panel that keeps every frame it is asked to paint.
#[derive(Debug)]
pub struct RecordingPanel {
    size: Size,
    initialized: bool,
    backlight: bool,
    frames: Vec<PixelBuffer>,
    fail_after: Option<usize>,
}

impl Default for RecordingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPanel {
    /// A 128×128 panel that always succeeds
    pub fn new() -> Self {
        Self {
            size: Size::new(PANEL_WIDTH, PANEL_HEIGHT),
            initialized: false,
            backlight: false,
            frames: Vec::new(),
            fail_after: None,
        }
    }

    /// A panel whose paint fails once `frames` frames have been accepted
    pub fn failing_after(frames: usize) -> Self {
        Self {
            fail_after: Some(frames),
            ..Self::new()
        }
    }

    /// Painted frames, oldest first
    pub fn frames(&self) -> &[PixelBuffer] {
        &self.frames
    }

    /// Most recent frame
    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.frames.last()
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current backlight state
    pub fn backlight_on(&self) -> bool {
        self.backlight
    }
}

impl PanelDriver for RecordingPanel {
    fn initialize(&mut self) -> Result<(), PanelError> {
        self.initialized = true;
        self.backlight = true;
        Ok(())
    }

    fn paint(&mut self, frame: PixelBuffer) -> Result<(), PanelError> {
        if !self.initialized {
            return Err(PanelError::NotInitialized);
        }
        if self.fail_after.is_some_and(|n| self.frames.len() >= n) {
            return Err(PanelError::Bus);
        }
        self.frames.push(frame);
        Ok(())
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), PanelError> {
        self.backlight = on;
        Ok(())
    }
}

/// Panel whose bus is never there.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPanel;

impl PanelDriver for FailingPanel {
    fn initialize(&mut self) -> Result<(), PanelError> {
        Err(PanelError::Bus)
    }

    fn paint(&mut self, _frame: PixelBuffer) -> Result<(), PanelError> {
        Err(PanelError::Bus)
    }

    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH, PANEL_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

    #[test]
    fn test_scripted_buttons_drain_then_go_quiet() {
        let mut src = ScriptedButtons::presses(&[Button::Up, Button::Key2]);
        assert_eq!(src.poll().as_slice(), &[Button::Up]);
        assert_eq!(src.poll().as_slice(), &[Button::Key2]);
        assert!(src.poll().is_empty());
    }

    #[test]
    fn test_recording_panel_requires_initialize() {
        let mut panel = RecordingPanel::new();
        let frame = PixelBuffer::new(128, 128, Rgb888::BLACK);
        assert_eq!(panel.paint(frame.clone()), Err(PanelError::NotInitialized));
        assert!(panel.initialize().is_ok());
        assert!(panel.paint(frame).is_ok());
        assert_eq!(panel.frames().len(), 1);
    }

    #[test]
    fn test_recording_panel_fails_on_schedule() {
        let mut panel = RecordingPanel::failing_after(1);
        assert!(panel.initialize().is_ok());
        let frame = PixelBuffer::new(128, 128, Rgb888::BLACK);
        assert!(panel.paint(frame.clone()).is_ok());
        assert_eq!(panel.paint(frame), Err(PanelError::Bus));
    }
}
