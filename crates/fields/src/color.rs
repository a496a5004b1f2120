//! Text colors as picked in a color input (`#rrggbb`).

use crate::{FieldError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Channels divided by 255, as PDF `rg` operands expect.
    pub fn normalized(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    pub fn from_normalized(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

/// A color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HexColor(Rgb);

impl HexColor {
    pub fn new(rgb: Rgb) -> Self {
        Self(rgb)
    }

    pub fn rgb(&self) -> Rgb {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FieldError::InvalidColor(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| FieldError::InvalidColor(s.to_string()))
        };

        Ok(Self(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        }))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.r, self.0.g, self.0.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        let a: HexColor = "#1a2B3c".parse().unwrap();
        let b: HexColor = "1a2b3c".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rgb(), Rgb { r: 0x1a, g: 0x2b, b: 0x3c });
        assert_eq!(a.to_string(), "#1a2b3c");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("#fff".parse::<HexColor>().is_err());
        assert!("#12345g".parse::<HexColor>().is_err());
        assert!("".parse::<HexColor>().is_err());
        assert!("#1234567".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_normalized_round_trip() {
        for hex in ["#000000", "#ffffff", "#7f8081", "#c0ffee", "#010203"] {
            let color: HexColor = hex.parse().unwrap();
            let (r, g, b) = color.rgb().normalized();
            assert!((0.0..=1.0).contains(&r));
            assert!((0.0..=1.0).contains(&g));
            assert!((0.0..=1.0).contains(&b));
            let back = HexColor::new(Rgb::from_normalized(r, g, b));
            assert_eq!(back.to_string(), hex);
        }
    }

    #[test]
    fn test_black_is_zero() {
        let color: HexColor = "#000000".parse().unwrap();
        assert_eq!(color.rgb().normalized(), (0.0, 0.0, 0.0));
    }
}
