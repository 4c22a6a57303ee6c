//! Board wiring for the 1.44" LCD HAT.
//!
//! Only the `hardware` feature pulls in `linux-embedded-hal`; without it the
//! launcher always runs headless and this module carries just the error type.

use thiserror_no_std::Error;

#[cfg(feature = "hardware")]
pub mod linux;

/// Errors while opening the HAT's buses and lines.
#[derive(Debug, Error)]
pub enum HardwareError {
    /// The SPI device node could not be opened or configured
    #[error("SPI {path}: {reason}")]
    Spi {
        /// Device node
        path: String,
        /// What went wrong
        reason: String,
    },
    /// A GPIO line could not be exported or configured
    #[error("GPIO {pin}: {reason}")]
    Gpio {
        /// BCM line number
        pin: u32,
        /// What went wrong
        reason: String,
    },
}
