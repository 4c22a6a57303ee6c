//! ST7735S Hardware Driver
//!
//! Blocking driver for the Sitronix ST7735S controller on the Waveshare
//! 1.44" LCD HAT (128×128, RGB565).
//!
//! # Wiring (Raspberry Pi, BCM numbering)
//!
//! | Signal | Pin | Direction |
//! |--------|-----|-----------|
//! | SCLK   | 11 (SPI0_SCLK) | Host → Panel |
//! | MOSI   | 10 (SPI0_MOSI) | Host → Panel |
//! | CS     | 8 (CE0), managed by `SpiDevice` | Host → Panel |
//! | DC     | 25 | Host → Panel |
//! | RST    | 27 | Host → Panel |
//! | BL     | 24 | Host → Panel |
//!
//! # Frame path
//!
//! ```text
//! PixelBuffer (Rgb888) → RGB565 big-endian → 2A/2B window → 2C → 4 KiB chunks
//! ```
//!
//! The visible area sits at column 2, row 1 of controller RAM; the window
//! commands apply that offset.

use embedded_graphics::prelude::Size;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use platform::config::{PANEL_HEIGHT, PANEL_WIDTH, PANEL_X_OFFSET, PANEL_Y_OFFSET};
use platform::{PanelDriver, PanelError, PixelBuffer};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest single SPI write for pixel data.
pub const CHUNK_SIZE: usize = 4096;

/// Bytes in one full RGB565 frame (128 × 128 × 2).
#[allow(clippy::arithmetic_side_effects)]
pub const FRAME_BYTES: usize = (PANEL_WIDTH * PANEL_HEIGHT * 2) as usize;

// ---------------------------------------------------------------------------
// Command enum
// ---------------------------------------------------------------------------

/// ST7735S command codes used by this driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Sleep out, then wait 120 ms.
    SleepOut = 0x11,
    /// Display on.
    DisplayOn = 0x29,
    /// Column address set: 4 data bytes (start hi/lo, end hi/lo).
    ColumnAddressSet = 0x2A,
    /// Row address set: 4 data bytes.
    RowAddressSet = 0x2B,
    /// Memory write: pixel data follows.
    MemoryWrite = 0x2C,
    /// Memory data access control (MADCTL): 1 data byte.
    MemoryAccessControl = 0x36,
    /// Interface pixel format: 1 data byte (0x05 = 16 bpp).
    PixelFormat = 0x3A,
    /// Frame rate control, normal mode: 3 data bytes.
    FrameRateNormal = 0xB1,
    /// Frame rate control, idle mode: 3 data bytes.
    FrameRateIdle = 0xB2,
    /// Frame rate control, partial mode: 6 data bytes.
    FrameRatePartial = 0xB3,
    /// Display inversion control: 1 data byte.
    InversionControl = 0xB4,
    /// Power control 1: 3 data bytes.
    PowerControl1 = 0xC0,
    /// Power control 2: 1 data byte.
    PowerControl2 = 0xC1,
    /// Power control 3 (normal mode): 2 data bytes.
    PowerControl3 = 0xC2,
    /// Power control 4 (idle mode): 2 data bytes.
    PowerControl4 = 0xC3,
    /// Power control 5 (partial mode): 2 data bytes.
    PowerControl5 = 0xC4,
    /// VCOM control: 1 data byte.
    VcomControl = 0xC5,
    /// Positive gamma correction: 16 data bytes.
    GammaPositive = 0xE0,
    /// Negative gamma correction: 16 data bytes.
    GammaNegative = 0xE1,
    /// Test command enable: 1 data byte.
    TestCommand = 0xF0,
    /// Disable RAM power save: 1 data byte.
    PowerSaveDisable = 0xF6,
}

/// Vendor register table, sent in order after the hardware reset.
///
/// MADCTL 0x68 = MX|MV (0x60) for the HAT's landscape mounting, plus BGR.
pub const INIT_SEQUENCE: &[(Command, &[u8])] = &[
    (Command::FrameRateNormal, &[0x01, 0x2C, 0x2D]),
    (Command::FrameRateIdle, &[0x01, 0x2C, 0x2D]),
    (Command::FrameRatePartial, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
    (Command::InversionControl, &[0x07]),
    (Command::PowerControl1, &[0xA2, 0x02, 0x84]),
    (Command::PowerControl2, &[0xC5]),
    (Command::PowerControl3, &[0x0A, 0x00]),
    (Command::PowerControl4, &[0x8A, 0x2A]),
    (Command::PowerControl5, &[0x8A, 0xEE]),
    (Command::VcomControl, &[0x0E]),
    (
        Command::GammaPositive,
        &[
            0x0F, 0x1A, 0x0F, 0x18, 0x2F, 0x28, 0x20, 0x22, 0x1F, 0x1B, 0x23, 0x37, 0x00, 0x07,
            0x02, 0x10,
        ],
    ),
    (
        Command::GammaNegative,
        &[
            0x0F, 0x1B, 0x0F, 0x17, 0x33, 0x2C, 0x29, 0x2E, 0x30, 0x30, 0x39, 0x3F, 0x00, 0x07,
            0x03, 0x10,
        ],
    ),
    (Command::TestCommand, &[0x01]),
    (Command::PowerSaveDisable, &[0x00]),
    (Command::PixelFormat, &[0x05]),
    (Command::MemoryAccessControl, &[0x68]),
];

/// RST high/low/high hold time (ms)
const RESET_HOLD_MS: u32 = 100;
/// Wait after SleepOut (ms)
const SLEEP_OUT_MS: u32 = 120;
/// Wait after DisplayOn (ms)
const DISPLAY_ON_MS: u32 = 10;

// ---------------------------------------------------------------------------
// Driver struct
// ---------------------------------------------------------------------------

/// ST7735S display driver.
///
/// Generic over:
/// - `SPI`: a blocking [`embedded_hal::spi::SpiDevice`] (manages CS).
/// - `DC`, `RST`, `BL`: [`embedded_hal::digital::OutputPin`] control lines.
/// - `DELAY`: [`embedded_hal::delay::DelayNs`] for reset and wake timing.
///
/// On the Pi supply `linux_embedded_hal::Delay`; in host tests supply
/// `embedded_hal_mock::eh1::delay::NoopDelay`.
pub struct St7735s<SPI, DC, RST, BL, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    bl: BL,
    delay: DELAY,
    initialized: bool,
}

impl<SPI, DC, RST, BL, DELAY> St7735s<SPI, DC, RST, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    /// Create a driver. Nothing is sent until [`PanelDriver::initialize`].
    pub fn new(spi: SPI, dc: DC, rst: RST, bl: BL, delay: DELAY) -> Self {
        Self {
            spi,
            dc,
            rst,
            bl,
            delay,
            initialized: false,
        }
    }

    /// Whether `initialize` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, DC, RST, BL, DELAY) {
        (self.spi, self.dc, self.rst, self.bl, self.delay)
    }

    // -----------------------------------------------------------------------
    // Low-level SPI helpers
    // -----------------------------------------------------------------------

    /// DC low, then one command byte.
    fn send_command(&mut self, cmd: Command) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[cmd as u8]).map_err(|_| PanelError::Bus)
    }

    /// DC high, then the data bytes.
    fn send_data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        self.spi.write(data).map_err(|_| PanelError::Bus)
    }

    fn cmd_data(&mut self, cmd: Command, data: &[u8]) -> Result<(), PanelError> {
        self.send_command(cmd)?;
        self.send_data(data)
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// RST HIGH 100 ms → LOW 100 ms → HIGH 100 ms.
    fn hardware_reset(&mut self) -> Result<(), PanelError> {
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Window
    // -----------------------------------------------------------------------

    /// Set the RAM write window to the visible rectangle `(x0, y0)..=(x1, y1)`.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), PanelError> {
        let (dx, dy) = (u16::from(PANEL_X_OFFSET), u16::from(PANEL_Y_OFFSET));
        let xs = x0.saturating_add(dx).to_be_bytes();
        let xe = x1.saturating_add(dx).to_be_bytes();
        let ys = y0.saturating_add(dy).to_be_bytes();
        let ye = y1.saturating_add(dy).to_be_bytes();
        self.cmd_data(Command::ColumnAddressSet, &[xs[0], xs[1], xe[0], xe[1]])?;
        self.cmd_data(Command::RowAddressSet, &[ys[0], ys[1], ye[0], ye[1]])?;
        self.send_command(Command::MemoryWrite)
    }

    /// Stream pixel bytes after `MemoryWrite`: DC high once, then chunks.
    fn write_pixels(&mut self, bytes: &[u8]) -> Result<(), PanelError> {
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        for chunk in bytes.chunks(CHUNK_SIZE) {
            self.spi.write(chunk).map_err(|_| PanelError::Bus)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, BL, DELAY> PanelDriver for St7735s<SPI, DC, RST, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    fn initialize(&mut self) -> Result<(), PanelError> {
        self.initialized = false;
        self.hardware_reset()?;
        self.set_backlight(true)?;

        for (cmd, data) in INIT_SEQUENCE {
            self.cmd_data(*cmd, data)?;
        }

        self.send_command(Command::SleepOut)?;
        self.delay.delay_ms(SLEEP_OUT_MS);
        self.send_command(Command::DisplayOn)?;
        self.delay.delay_ms(DISPLAY_ON_MS);

        self.initialized = true;
        Ok(())
    }

    fn paint(&mut self, frame: PixelBuffer) -> Result<(), PanelError> {
        if !self.initialized {
            return Err(PanelError::NotInitialized);
        }
        if frame.width() != PANEL_WIDTH || frame.height() != PANEL_HEIGHT {
            return Err(PanelError::FrameSize {
                width: frame.width(),
                height: frame.height(),
            });
        }

        // PANEL_WIDTH/HEIGHT are 128: the casts cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
        let (x1, y1) = ((PANEL_WIDTH - 1) as u16, (PANEL_HEIGHT - 1) as u16);
        self.set_window(0, 0, x1, y1)?;
        self.write_pixels(&frame.to_rgb565_bytes())
    }

    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH, PANEL_HEIGHT)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), PanelError> {
        if on {
            self.bl.set_high().map_err(|_| PanelError::Pin)
        } else {
            self.bl.set_low().map_err(|_| PanelError::Pin)
        }
    }
}
