//! This module handles colours and their hex string representations.

use crate::ConfigError;

/// An RGB colour.
pub type RGBArray = [u8; 3];

/// Parse a colour of the form `#RRGGBB`. The leading `#` is optional.
pub fn parse_hex_colour(text: &str) -> Result<RGBArray, ConfigError> {
    let invalid = || ConfigError::InvalidColour(text.to_string());

    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };

    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Format a colour as `#RRGGBB` with uppercase hex digits.
pub fn hex_colour([r, g, b]: RGBArray) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Serde support for colours written either as `"#RRGGBB"` strings or as `(r, g, b)` tuples.
/// Colours are always written back as hex strings.
pub mod hex {
    use super::{hex_colour, parse_hex_colour, RGBArray};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Either way of writing a colour.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColourRepr {
        Hex(String),
        Rgb(RGBArray),
    }

    /// Serialize a colour as a hex string.
    pub fn serialize<S: Serializer>(colour: &RGBArray, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_colour(*colour))
    }

    /// Deserialize a colour from a hex string or an RGB tuple.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RGBArray, D::Error> {
        match ColourRepr::deserialize(deserializer)? {
            ColourRepr::Hex(text) => parse_hex_colour(&text).map_err(de::Error::custom),
            ColourRepr::Rgb(rgb) => Ok(rgb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_colour_test() {
        assert_eq!(parse_hex_colour("#D4AF37").unwrap(), [0xD4, 0xAF, 0x37]);
        assert_eq!(parse_hex_colour("b76e79").unwrap(), [0xB7, 0x6E, 0x79]);
        assert_eq!(parse_hex_colour("#ffffff").unwrap(), [255, 255, 255]);

        assert!(parse_hex_colour("#FFF").is_err());
        assert!(parse_hex_colour("#GGGGGG").is_err());
        assert!(parse_hex_colour("#D4AF37FF").is_err());
        assert!(parse_hex_colour("").is_err());
    }

    #[test]
    fn hex_colour_test() {
        assert_eq!(hex_colour([0xD4, 0xAF, 0x37]), "#D4AF37");
        assert_eq!(hex_colour([0, 0x42, 0x25]), "#004225");
        assert_eq!(parse_hex_colour(&hex_colour([1, 2, 3])).unwrap(), [1, 2, 3]);
    }
}
