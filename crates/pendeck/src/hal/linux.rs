//! spidev + sysfs GPIO backing for the panel and the buttons.
//!
//! Pull-ups on the button lines are not configurable through sysfs; the HAT
//! relies on the Pi's boot-time pull configuration (`gpio=...=pu` in
//! `config.txt`).

use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use platform::config::{panel_pins, BUTTON_PINS};
use platform::{BitOrder, GpioButtons, SpiConfig, SpiMode};

use super::HardwareError;
use crate::clock::MonotonicClock;
use crate::display::St7735s;

/// SPI device node the panel sits on (CE0).
pub const SPI_DEVICE: &str = "/dev/spidev0.0";

/// The HAT's ST7735S.
pub type HatPanel = St7735s<SpidevDevice, SysfsPin, SysfsPin, SysfsPin, Delay>;

/// The HAT's eight buttons.
pub type HatButtons = GpioButtons<SysfsPin, MonotonicClock>;

fn spi_options(config: &SpiConfig) -> SpidevOptions {
    let mut mode = match config.mode {
        SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
        SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
        SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
        SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
    };
    if config.bit_order == BitOrder::LsbFirst {
        mode |= SpiModeFlags::SPI_LSB_FIRST;
    }
    SpidevOptions::new()
        .bits_per_word(config.bits_per_word)
        .max_speed_hz(config.frequency)
        .mode(mode)
        .build()
}

fn open_spi() -> Result<SpidevDevice, HardwareError> {
    let spi_error = |reason: String| HardwareError::Spi {
        path: SPI_DEVICE.to_string(),
        reason,
    };
    let mut spi = SpidevDevice::open(SPI_DEVICE).map_err(|e| spi_error(format!("{e:?}")))?;
    spi.configure(&spi_options(&SpiConfig::PANEL))
        .map_err(|e| spi_error(e.to_string()))?;
    Ok(spi)
}

fn line(pin: u32, direction: Direction) -> Result<SysfsPin, HardwareError> {
    let gpio_error = |e: linux_embedded_hal::sysfs_gpio::Error| HardwareError::Gpio {
        pin,
        reason: e.to_string(),
    };
    let line = SysfsPin::new(u64::from(pin));
    line.export().map_err(gpio_error)?;
    line.set_direction(direction).map_err(gpio_error)?;
    Ok(line)
}

/// Open the panel's bus and control lines. The controller itself is
/// initialized by the runtime.
pub fn open_panel() -> Result<HatPanel, HardwareError> {
    let spi = open_spi()?;
    let dc = line(panel_pins::DC, Direction::Low)?;
    let rst = line(panel_pins::RST, Direction::High)?;
    let bl = line(panel_pins::BL, Direction::Low)?;
    tracing::info!("panel lines open on {SPI_DEVICE}");
    Ok(St7735s::new(spi, dc, rst, bl, Delay))
}

/// Export the eight button lines as inputs.
pub fn open_buttons(clock: MonotonicClock) -> Result<HatButtons, HardwareError> {
    let [up, down, left, right, center, key1, key2, key3] = BUTTON_PINS;
    let lines = [
        line(up, Direction::In)?,
        line(down, Direction::In)?,
        line(left, Direction::In)?,
        line(right, Direction::In)?,
        line(center, Direction::In)?,
        line(key1, Direction::In)?,
        line(key2, Direction::In)?,
        line(key3, Direction::In)?,
    ];
    Ok(GpioButtons::new(lines, clock))
}
