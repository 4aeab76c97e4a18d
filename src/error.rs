use thiserror::Error;

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::vocabulary::UnknownValue;

/// A request model was built with fields that violate one of its invariants.
///
/// Raised before anything is sent to the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("blink text can be set only if gradient and rainbow are not used")]
    BlinkWithGradientOrRainbow,

    #[error("fade text can be set only if gradient and rainbow are not used")]
    FadeWithGradientOrRainbow,

    #[error("{field} can have at most {max} values, got {len}")]
    TooManyValues {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("sound and rtttl can't be set together")]
    SoundWithRtttl,

    #[error("kelvin and color can't be set together")]
    KelvinWithColor,

    #[error("fade and blink can't be set together")]
    BlinkWithFade,

    #[error("{field} cannot be black, the device reads 0 as \"use the global text color\"")]
    BlackAppColor { field: &'static str },

    #[error("invalid forwarding client {url:?}: {reason}")]
    InvalidClient { url: String, reason: String },
}

impl ValidationError {
    pub(crate) fn check_range(
        field: &'static str,
        value: Option<i64>,
        min: i64,
        max: i64,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) if value < min || value > max => Err(ValidationError::OutOfRange {
                field,
                min,
                max,
                value,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_len<T>(
        field: &'static str,
        values: &Option<Vec<T>>,
        max: usize,
    ) -> Result<(), ValidationError> {
        match values {
            Some(values) if values.len() > max => Err(ValidationError::TooManyValues {
                field,
                max,
                len: values.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// A device response did not have the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed {what} response: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("screen must hold {expected} pixels, got {actual}")]
    ScreenLength { expected: usize, actual: usize },

    #[error("invalid screen pixel: {0}")]
    Pixel(#[from] ColorError),

    #[error(transparent)]
    Unknown(#[from] UnknownValue),
}

pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    what: &'static str,
    body: &str,
) -> Result<T, DecodeError> {
    return serde_json::from_str(body).map_err(|source| DecodeError::Json { what, source });
}

/// Everything [`crate::AwtrixClient`] can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The device answered with a non-success status.
    #[error("device answered {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
