//! Panel drivers for the Pen-Deck
//!
//! The Waveshare 1.44" HAT carries an ST7735S controller. The driver is
//! always compiled (no hardware gate) so host tests can exercise it with
//! `embedded-hal-mock`.

use embedded_graphics::prelude::Size;
use platform::config::{PANEL_HEIGHT, PANEL_WIDTH};
use platform::{PanelDriver, PanelError, PixelBuffer};

pub mod driver;

pub use driver::{Command, St7735s, CHUNK_SIZE, FRAME_BYTES, INIT_SEQUENCE};

/// Stand-in when no panel hardware was found. Initialization always fails,
/// so the runtime starts headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPanel;

impl PanelDriver for NoPanel {
    fn initialize(&mut self) -> Result<(), PanelError> {
        Err(PanelError::Bus)
    }

    fn paint(&mut self, _frame: PixelBuffer) -> Result<(), PanelError> {
        Err(PanelError::NotInitialized)
    }

    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH, PANEL_HEIGHT)
    }
}
