//! RGB color type shared by the overlay renderer, the profile document and
//! the settings panel. Serialized as a `#RRGGBB` hex string.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color '{0}' (expected #RRGGBB)")]
pub struct ParseColorError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 0xFF, g: 0xFF, b: 0xFF };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string (leading `#` optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ParseColorError(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Expand to the 16-bit-per-channel color the RENDER extension expects,
    /// fully opaque.
    pub fn to_render_color(self) -> x11rb::protocol::render::Color {
        let expand = |c: u8| u16::from(c) * 0x0101;
        x11rb::protocol::render::Color {
            red: expand(self.r),
            green: expand(self.g),
            blue: expand(self.b),
            alpha: 0xFFFF,
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_roundtrip() {
        let color = Rgb::from_hex("#67FF26").unwrap();
        assert_eq!(color, Rgb::new(0x67, 0xFF, 0x26));
        assert_eq!(color.to_hex(), "#67FF26");
    }

    #[test]
    fn test_from_hex_without_hash_and_lowercase() {
        assert_eq!(Rgb::from_hex("ff00aa").unwrap(), Rgb::new(0xFF, 0x00, 0xAA));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_render_color_expansion() {
        let color = Rgb::new(0xFF, 0x00, 0x80).to_render_color();
        assert_eq!(color.red, 0xFFFF);
        assert_eq!(color.green, 0x0000);
        assert_eq!(color.blue, 0x8080);
        assert_eq!(color.alpha, 0xFFFF);
    }
}
