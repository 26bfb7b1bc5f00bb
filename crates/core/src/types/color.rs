//! Named garment colors and their RGB values.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors from parsing a hex color.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0}")]
    InvalidLength(String),
    #[error("invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] when the leading `#` is missing, the digit count
    /// is wrong, or a digit is not hexadecimal.
    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        let digits = input
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(input.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(input.to_string()));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidDigit(input.to_string()))
        };
        match digits.len() {
            6 => Ok(Self::new(
                channel(digits.get(0..2).unwrap_or_default())?,
                channel(digits.get(2..4).unwrap_or_default())?,
                channel(digits.get(4..6).unwrap_or_default())?,
            )),
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = channel(&c.to_string())?;
                    *slot = v * 16 + v;
                }
                let [r, g, b] = out;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ColorError::InvalidLength(input.to_string())),
        }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

/// An ordered set of named colors offered to shoppers.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<(String, Rgb)>,
}

impl Palette {
    /// Build a palette from `(name, color)` pairs, keeping their order.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Rgb)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, rgb)| (name.into().to_ascii_lowercase(), rgb))
                .collect(),
        }
    }

    /// Colors offered by the design tool.
    #[must_use]
    pub fn design() -> Self {
        Self::new([
            ("black", Rgb::new(0x00, 0x00, 0x00)),
            ("white", Rgb::new(0xff, 0xff, 0xff)),
            ("navy", Rgb::new(0x1e, 0x3a, 0x8a)),
            ("red", Rgb::new(0xdc, 0x26, 0x26)),
            ("gray", Rgb::new(0x6b, 0x72, 0x80)),
        ])
    }

    /// Look up a color by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, rgb)| *rgb)
    }

    /// Look up a color by name, falling back to black.
    #[must_use]
    pub fn get_or_black(&self, name: &str) -> Rgb {
        self.get(name).unwrap_or(Rgb::BLACK)
    }

    /// Whether the palette offers this color name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Color names in palette order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl Default for Palette {
    /// The design palette plus the extra shop-only colors.
    fn default() -> Self {
        let mut palette = Self::design();
        palette.entries.push(("green".to_string(), Rgb::new(0x16, 0xa3, 0x4a)));
        palette.entries.push(("vintage".to_string(), Rgb::new(0xa8, 0xa2, 0x9e)));
        palette
    }
}
