//! Panel abstraction layer

use embedded_graphics::prelude::Size;

use crate::framebuffer::PixelBuffer;

/// Driver for a full-frame colour panel.
///
/// The runtime owns exactly one driver. Every redraw builds a fresh
/// [`PixelBuffer`] and hands it over by value; there is no partial update.
pub trait PanelDriver {
    /// Run the controller's reset and register-initialization sequence.
    ///
    /// An error means the display is unavailable and the caller should fall
    /// back to headless operation.
    fn initialize(&mut self) -> Result<(), PanelError>;

    /// Replace the whole visible frame.
    fn paint(&mut self, frame: PixelBuffer) -> Result<(), PanelError>;

    /// Visible panel dimensions
    fn size(&self) -> Size;

    /// Switch the backlight. Panels without a controllable backlight
    /// accept and ignore this.
    fn set_backlight(&mut self, _on: bool) -> Result<(), PanelError> {
        Ok(())
    }
}

/// Panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// SPI transfer failed
    Bus,
    /// A control line (DC, RST, BL) could not be driven
    Pin,
    /// `paint` was called before a successful `initialize`
    NotInitialized,
    /// The frame dimensions do not match the panel
    FrameSize {
        /// Width of the rejected frame
        width: u32,
        /// Height of the rejected frame
        height: u32,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for PanelError {}

impl core::fmt::Display for PanelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "Panel bus write failed"),
            Self::Pin => write!(f, "Panel control line unavailable"),
            Self::NotInitialized => write!(f, "Panel not initialized"),
            Self::FrameSize { width, height } => {
                write!(f, "Frame size {width}x{height} does not match panel")
            }
        }
    }
}
