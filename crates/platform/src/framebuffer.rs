//! Full-frame 24-bit RGB pixel buffer
//!
//! A [`PixelBuffer`] is produced fresh for every redraw, drawn into through
//! `embedded-graphics`, and handed by value to a [`crate::PanelDriver`],
//! which consumes it. Nothing keeps a frame alive across redraws.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;

use crate::color::rgb565_bytes;

/// Width×height array of 24-bit RGB pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Create a buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            pixels: vec![background; len],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
    }

    /// Colour at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Set the colour at `(x, y)`. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) {
            *slot = color;
        }
    }

    /// Fill the whole buffer with one colour.
    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Encode the frame as the panel's wire payload: RGB565, MSB first,
    /// two bytes per pixel.
    pub fn to_rgb565_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len().saturating_mul(2));
        for px in &self.pixels {
            out.extend_from_slice(&rgb565_bytes(px.r(), px.g(), px.b()));
        }
        out
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Negative coordinates fall outside the panel
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
