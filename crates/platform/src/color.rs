//! RGB565 packing for the panel's 16-bit pixel format
//!
//! The controller is configured for 5-6-5 colour (`COLMOD = 0x05`). Each
//! pixel travels as two bytes, most significant byte first:
//!
//! ```text
//! hi = RRRRRGGG   (top 5 bits of red, top 3 bits of green)
//! lo = GGGBBBBB   (next 3 bits of green, top 5 bits of blue)
//! ```

// Shifts are by constants below the operand width.
#![allow(clippy::arithmetic_side_effects)]

/// Pack 8-bit RGB into the panel's 16-bit word.
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let [hi, lo] = rgb565_bytes(r, g, b);
    u16::from_be_bytes([hi, lo])
}

/// Pack 8-bit RGB into the two bytes sent on the wire (MSB first).
pub const fn rgb565_bytes(r: u8, g: u8, b: u8) -> [u8; 2] {
    let hi = (r & 0xF8) | (g >> 5);
    let lo = ((g << 3) & 0xE0) | (b >> 3);
    [hi, lo]
}

/// Expand a packed word back to 8-bit RGB.
///
/// Lossy: the low 3 bits of red and blue and the low 2 bits of green are
/// zero in the result.
pub const fn unpack_rgb565(word: u16) -> (u8, u8, u8) {
    let [hi, lo] = word.to_be_bytes();
    let r = hi & 0xF8;
    let g = ((hi & 0x07) << 5) | ((lo & 0xE0) >> 3);
    let b = (lo & 0x1F) << 3;
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_pure_red() {
        assert_eq!(pack_rgb565(255, 0, 0), 0xF800);
    }

    #[test]
    fn test_pack_black_is_zero() {
        assert_eq!(pack_rgb565(0, 0, 0), 0);
    }

    #[test]
    fn test_pack_primaries() {
        assert_eq!(pack_rgb565(0, 255, 0), 0x07E0);
        assert_eq!(pack_rgb565(0, 0, 255), 0x001F);
        assert_eq!(pack_rgb565(255, 255, 255), 0xFFFF);
    }

    #[test]
    fn test_wire_order_is_msb_first() {
        assert_eq!(rgb565_bytes(255, 0, 0), [0xF8, 0x00]);
        assert_eq!(rgb565_bytes(0, 0, 255), [0x00, 0x1F]);
    }

    #[test]
    fn test_unpack_title_bar_blue() {
        // (0, 100, 200) is the title bar colour
        let (r, g, b) = unpack_rgb565(pack_rgb565(0, 100, 200));
        assert_eq!((r, g, b), (0, 100, 200));
    }
}
