//! Serial bus configuration for the panel link

use crate::config::PANEL_SPI_HZ;

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
    /// Bits per word
    pub bits_per_word: u8,
}

impl SpiConfig {
    /// The ST7735S link on the HAT: mode 0, 9 MHz, MSB first, 8-bit words.
    pub const PANEL: SpiConfig = SpiConfig {
        frequency: PANEL_SPI_HZ,
        mode: SpiMode::Mode0,
        bit_order: BitOrder::MsbFirst,
        bits_per_word: 8,
    };
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::PANEL
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_link_defaults() {
        let cfg = SpiConfig::default();
        assert_eq!(cfg.frequency, 9_000_000);
        assert_eq!(cfg.mode, SpiMode::Mode0);
        assert_eq!(cfg.bit_order, BitOrder::MsbFirst);
    }
}
