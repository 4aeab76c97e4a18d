use serde::Serialize;

use crate::color::Color;
use crate::error::ValidationError;
use crate::vocabulary::UnknownValue;

/// The three small status dots along the right edge of the matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Indicator {
    UpperRight = 1,
    Right = 2,
    LowerRight = 3,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::UpperRight, Indicator::Right, Indicator::LowerRight];

    pub fn number(&self) -> u8 {
        return *self as u8;
    }

    /// Endpoint path, e.g. `indicator2`.
    pub fn path(&self) -> String {
        return format!("indicator{}", self.number());
    }
}

impl TryFrom<u8> for Indicator {
    type Error = UnknownValue;

    fn try_from(value: u8) -> Result<Indicator, UnknownValue> {
        match value {
            1 => Ok(Indicator::UpperRight),
            2 => Ok(Indicator::Right),
            3 => Ok(Indicator::LowerRight),
            _ => Err(UnknownValue {
                kind: "indicator",
                value: value.to_string(),
            }),
        }
    }
}

/// Body of `POST indicator{N}`. Black hides the indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IndicatorState {
    color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    blink: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fade: Option<u32>,
}

impl IndicatorState {
    /// `blink` and `fade` are intervals in milliseconds; at most one may be set.
    pub fn new(color: Color, blink: Option<u32>, fade: Option<u32>) -> Result<IndicatorState, ValidationError> {
        if blink.is_some() && fade.is_some() {
            return Err(ValidationError::BlinkWithFade);
        }
        return Ok(IndicatorState { color, blink, fade });
    }

    pub fn hidden() -> IndicatorState {
        return IndicatorState {
            color: Color::BLACK,
            blink: None,
            fade: None,
        };
    }

    pub fn color(&self) -> Color {
        return self.color;
    }
}
