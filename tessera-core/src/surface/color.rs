//! Pixel colours

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All channels off
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Warm off-white used for lit pixels
    pub const WHEAT: Rgb = Rgb::new(0xF5, 0xDE, 0xB3);

    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Scale every channel by `brightness / 256`
    ///
    /// `brightness` 255 leaves the colour unchanged; 0 turns it off.
    pub const fn scale(self, brightness: u8) -> Self {
        Self {
            r: scale8(self.r, brightness),
            g: scale8(self.g, brightness),
            b: scale8(self.b, brightness),
        }
    }

    /// Pack as a WS2812 word: GRB in the top 24 bits
    pub const fn to_grb_word(self) -> u32 {
        ((self.g as u32) << 24) | ((self.r as u32) << 16) | ((self.b as u32) << 8)
    }
}

const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#F5DEB3"), Some(Rgb::WHEAT));
        assert_eq!(Rgb::from_hex("#000000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_hex("F5DEB3"), None);
        assert_eq!(Rgb::from_hex("#F5DEB"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_scale() {
        assert_eq!(Rgb::WHEAT.scale(255), Rgb::WHEAT);
        assert_eq!(Rgb::WHEAT.scale(0), Rgb::BLACK);
        // Brightness 5: 245 * 6 / 256 = 5
        assert_eq!(Rgb::WHEAT.scale(5), Rgb::new(5, 5, 4));
    }

    #[test]
    fn test_grb_word() {
        assert_eq!(Rgb::new(0x11, 0x22, 0x33).to_grb_word(), 0x2211_3300);
    }
}
