use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

use palette::Srgb;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("unrecognized color {0:?}")]
    Unrecognized(String),

    #[error("color integer {0:#X} does not fit in 24 bits")]
    OutOfRange(u64),
}

/// How `Color::to_hex` renders its digits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HexForm {
    /// `#RGB` / `#RGBA` whenever every byte is a repeated nibble.
    Short,
    /// Always `#RRGGBB` / `#RRGGBBAA`. This is what the device expects.
    Long,
}

/// An sRGB color with an optional alpha byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: Option<u8>,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Color {
        return Color {
            red,
            green,
            blue,
            alpha: None,
        };
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        return Color {
            red,
            green,
            blue,
            alpha: Some(alpha),
        };
    }

    pub fn red(&self) -> u8 {
        return self.red;
    }

    pub fn green(&self) -> u8 {
        return self.green;
    }

    pub fn blue(&self) -> u8 {
        return self.blue;
    }

    pub fn alpha(&self) -> Option<u8> {
        return self.alpha;
    }

    /// Initialize from an integer that looks like 0xRRGGBB.
    pub fn from_int(x: u32) -> Result<Color, ColorError> {
        if x > 0xffffff {
            return Err(ColorError::OutOfRange(x.into()));
        }
        return Ok(Color::rgb(
            ((x >> 16) & 0xff) as u8,
            ((x >> 8) & 0xff) as u8,
            (x & 0xff) as u8,
        ));
    }

    /// Render as 0xRRGGBB. Alpha is dropped.
    pub fn to_int(&self) -> u32 {
        return ((self.red as u32) << 16) | ((self.green as u32) << 8) | (self.blue as u32);
    }

    pub fn to_hex(&self, form: HexForm) -> String {
        let mut bytes = vec![self.red, self.green, self.blue];
        if let Some(alpha) = self.alpha {
            bytes.push(alpha);
        }
        // 0x00, 0x11, .., 0xFF are exactly the multiples of 17.
        let collapse = form == HexForm::Short && bytes.iter().all(|b| b % 17 == 0);
        let mut out = String::with_capacity(1 + 2 * bytes.len());
        out.push('#');
        for byte in bytes {
            // Writing into a String cannot fail.
            let _ = if collapse {
                write!(out, "{:X}", byte >> 4)
            } else {
                write!(out, "{:02X}", byte)
            };
        }
        return out;
    }
}

fn parse_hex(digits: &str) -> Option<Color> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte_at = |i: usize, width: usize| -> Option<u8> {
        let value = u8::from_str_radix(&digits[i * width..(i + 1) * width], 16).ok()?;
        return Some(if width == 1 { value * 17 } else { value });
    };
    let width = match digits.len() {
        3 | 4 => 1,
        6 | 8 => 2,
        _ => return None,
    };
    let mut color = Color::rgb(byte_at(0, width)?, byte_at(1, width)?, byte_at(2, width)?);
    if digits.len() == 4 * width {
        color.alpha = Some(byte_at(3, width)?);
    }
    return Some(color);
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts CSS color names and `#`/`0x` prefixed (or bare) hex in
    /// 3, 4, 6 or 8 digit form.
    fn from_str(text: &str) -> Result<Color, ColorError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if let Some(color) = parse_hex(digits) {
            return Ok(color);
        }
        return palette::named::from_str(&trimmed.to_ascii_lowercase())
            .map(Color::from)
            .ok_or_else(|| ColorError::Unrecognized(text.to_string()));
    }
}

impl TryFrom<u32> for Color {
    type Error = ColorError;

    fn try_from(value: u32) -> Result<Color, ColorError> {
        return Color::from_int(value);
    }
}

impl From<Srgb<u8>> for Color {
    fn from(color: Srgb<u8>) -> Color {
        return Color::rgb(color.red, color.green, color.blue);
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Srgb<u8> {
        return Srgb::new(color.red, color.green, color.blue);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex(HexForm::Long))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex(HexForm::Long))
    }
}

/// Colors arrive from the device either as text or as packed integers.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ColorInput {
    Int(u64),
    Text(String),
}

impl ColorInput {
    pub(crate) fn into_color(self) -> Result<Color, ColorError> {
        match self {
            ColorInput::Int(x) => {
                let x = u32::try_from(x).map_err(|_| ColorError::OutOfRange(x))?;
                Color::from_int(x)
            }
            ColorInput::Text(text) => text.parse(),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        ColorInput::deserialize(deserializer)?
            .into_color()
            .map_err(de::Error::custom)
    }
}

/// Serde adapter for optional colors that travel as 0xRRGGBB integers.
pub(crate) mod int_form {
    use super::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<Color>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => serializer.serialize_u32(color.to_int()),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Color>, D::Error> {
        Option::<Color>::deserialize(deserializer)
    }
}
