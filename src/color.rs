use std::{fmt, str::FromStr};

use log::warn;

use crate::{internal_util::lerp, RenderError};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);

    /// Parse a color, falling back to black if the string is malformed.
    pub fn from_hex_or_black(hex: &str) -> Self {
        hex.parse().unwrap_or_else(|err| {
            warn!("{}; using black", err);
            Self::BLACK
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Per-channel linear interpolation, unrounded.
    pub fn lerp(&self, other: &Self, t: f64) -> [f64; 3] {
        [
            lerp(self.0 as f64, other.0 as f64, t),
            lerp(self.1 as f64, other.1 as f64, t),
            lerp(self.2 as f64, other.2 as f64, t),
        ]
    }
}

impl FromStr for Rgb {
    type Err = RenderError;

    /// Accepts exactly six hex digits with an optional leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RenderError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| RenderError::InvalidColor(s.to_string()))
        };
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serialize")]
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Ok(Self::from_hex_or_black(&hex))
    }
}
