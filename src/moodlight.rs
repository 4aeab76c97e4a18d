use serde::Serialize;

use crate::color::Color;
use crate::error::ValidationError;

/// Fills the whole matrix with one color or color temperature.
///
/// A moodlight with nothing set turns the mode off again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Moodlight {
    #[serde(skip_serializing_if = "Option::is_none")]
    brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kelvin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
}

impl Moodlight {
    pub fn new(
        brightness: Option<u8>,
        kelvin: Option<u32>,
        color: Option<Color>,
    ) -> Result<Moodlight, ValidationError> {
        if kelvin.is_some() && color.is_some() {
            return Err(ValidationError::KelvinWithColor);
        }
        return Ok(Moodlight {
            brightness,
            kelvin,
            color,
        });
    }

    pub fn disabled() -> Moodlight {
        return Moodlight::default();
    }

    pub fn with_color(brightness: Option<u8>, color: Color) -> Moodlight {
        return Moodlight {
            brightness,
            kelvin: None,
            color: Some(color),
        };
    }

    pub fn with_kelvin(brightness: Option<u8>, kelvin: u32) -> Moodlight {
        return Moodlight {
            brightness,
            kelvin: Some(kelvin),
            color: None,
        };
    }

    pub fn is_disabled(&self) -> bool {
        return *self == Moodlight::default();
    }

    pub fn brightness(&self) -> Option<u8> {
        return self.brightness;
    }

    pub fn kelvin(&self) -> Option<u32> {
        return self.kelvin;
    }

    pub fn color(&self) -> Option<Color> {
        return self.color;
    }
}
