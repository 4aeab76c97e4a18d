//! Closed sets of codes understood by the device.
//!
//! Every enum maps one-to-one onto the exact string or integer the firmware
//! sends and expects. Lookups never coerce: an unknown wire value is an
//! [`UnknownValue`] error, since it usually means the firmware is newer
//! than this crate.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized {kind} value {value:?}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Enums that travel as mixed-case strings, e.g. `"PingPong"`.
macro_rules! string_vocabulary {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal,)* }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)*
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<$name, UnknownValue> {
                match s {
                    $($wire => Ok($name::$variant),)*
                    _ => Err(UnknownValue { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<$name, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

/// Enums that travel as small integers, each with an upper-case symbolic name.
macro_rules! code_vocabulary {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident = $code:literal => $symbol:literal,)* }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $code,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn code(&self) -> u8 {
                *self as u8
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol,)*
                }
            }

            /// Case-insensitive lookup by symbolic name.
            pub fn from_name(name: &str) -> Result<$name, UnknownValue> {
                $(
                    if name.eq_ignore_ascii_case($symbol) {
                        return Ok($name::$variant);
                    }
                )*
                Err(UnknownValue { kind: $kind, value: name.to_string() })
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownValue;

            fn try_from(value: u8) -> Result<$name, UnknownValue> {
                match value {
                    $($code => Ok($name::$variant),)*
                    _ => Err(UnknownValue { kind: $kind, value: value.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<$name, D::Error> {
                let code = u8::deserialize(deserializer)?;
                $name::try_from(code).map_err(de::Error::custom)
            }
        }
    };
}

string_vocabulary! {
    /// Background effects drawn behind an app or notification.
    EffectType, "effect" {
        Fade => "Fade",
        MovingLine => "MovingLine",
        BrickBreaker => "BrickBreaker",
        PingPong => "PingPong",
        Radar => "Radar",
        Checkerboard => "Checkerboard",
        Fireworks => "Fireworks",
        PlasmaCloud => "PlasmaCloud",
        Ripple => "Ripple",
        Snake => "Snake",
        Pacifica => "Pacifica",
        TheaterChase => "TheaterChase",
        Plasma => "Plasma",
        Matrix => "Matrix",
        SwirlIn => "SwirlIn",
        SwirlOut => "SwirlOut",
        LookingEyes => "LookingEyes",
        TwinklingStars => "TwinklingStars",
        ColorWaves => "ColorWaves",
    }
}

string_vocabulary! {
    /// 16-color palettes an effect blends through.
    Palette, "palette" {
        Cloud => "Cloud",
        Lava => "Lava",
        Ocean => "Ocean",
        Forest => "Forest",
        Stripe => "Stripe",
        Party => "Party",
        Heat => "Heat",
        Rainbow => "Rainbow",
    }
}

string_vocabulary! {
    /// Allowed `TFORMAT` strftime patterns for the time app.
    TimeFormat, "time format" {
        HourMinuteSecond => "%H:%M:%S",
        Hour12MinuteSecond => "%l:%M:%S",
        HourMinute => "%H:%M",
        HourMinuteBlink => "%H %M",
        Hour12Minute => "%l:%M",
        Hour12MinuteBlink => "%l %M",
        Hour12MinuteMeridiem => "%l:%M %p",
        Hour12MinuteBlinkMeridiem => "%l %M %p",
    }
}

string_vocabulary! {
    /// Allowed `DFORMAT` strftime patterns for the date app.
    DateFormat, "date format" {
        DayMonthYearDots => "%d.%m.%y",
        DayMonthDots => "%d.%m",
        YearMonthDay => "%y-%m-%d",
        MonthDayDash => "%m-%d",
        MonthDayYearSlash => "%m/%d/%y",
        MonthDaySlash => "%m/%d",
        DayMonthYearSlash => "%d/%m/%y",
        DayMonthSlash => "%d/%m",
        MonthDayYearDash => "%m-%d-%y",
    }
}

code_vocabulary! {
    /// Animation played when switching between apps.
    TransitionType, "transition" {
        Random = 0 => "RANDOM",
        Slide = 1 => "SLIDE",
        Dim = 2 => "DIM",
        Zoom = 3 => "ZOOM",
        Rotate = 4 => "ROTATE",
        Pixelate = 5 => "PIXELATE",
        Curtain = 6 => "CURTAIN",
        Ripple = 7 => "RIPPLE",
        Blink = 8 => "BLINK",
        Reload = 9 => "RELOAD",
        Fade = 10 => "FADE",
    }
}

code_vocabulary! {
    TextCase, "text case" {
        Global = 0 => "GLOBAL",
        ForceUppercase = 1 => "FORCE_UPPERCASE",
        AsSent = 2 => "SHOW_AS_IT_SEND",
    }
}

code_vocabulary! {
    /// Icon movement while the text scrolls.
    PushIcon, "push icon" {
        NotMoving = 0 => "NOT_MOVING",
        MovingOnce = 1 => "MOVING_ONE_TIME",
        Moving = 2 => "MOVING",
    }
}

code_vocabulary! {
    /// What happens to a custom app whose lifetime expired.
    LifetimeMode, "lifetime mode" {
        Delete = 0 => "DELETE",
        Stale = 1 => "STALE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_wire_names_round_trip() {
        for effect in EffectType::ALL {
            assert_eq!(effect.as_str().parse::<EffectType>().unwrap(), *effect);
        }
        assert_eq!(EffectType::ALL.len(), 19);
        assert_eq!(EffectType::PingPong.as_str(), "PingPong");
    }

    #[test]
    fn effect_lookup_is_exact() {
        let err = "pingpong".parse::<EffectType>().unwrap_err();
        assert_eq!(err.kind, "effect");
        assert_eq!(err.value, "pingpong");
    }

    #[test]
    fn transition_codes_and_names() {
        assert_eq!(TransitionType::ALL.len(), 11);
        assert_eq!(TransitionType::try_from(10).unwrap(), TransitionType::Fade);
        assert_eq!(TransitionType::from_name("Pixelate").unwrap(), TransitionType::Pixelate);
        assert_eq!(TransitionType::Slide.code(), 1);
        assert!(TransitionType::try_from(11).is_err());
        assert!(TransitionType::from_name("Wipe").is_err());
    }

    #[test]
    fn code_enums_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&LifetimeMode::Stale).unwrap(), "1");
        assert_eq!(serde_json::to_string(&TextCase::Global).unwrap(), "0");
        let push: PushIcon = serde_json::from_str("2").unwrap();
        assert_eq!(push, PushIcon::Moving);
        assert!(serde_json::from_str::<PushIcon>("3").is_err());
    }

    #[test]
    fn string_enums_serialize_as_wire_strings() {
        assert_eq!(serde_json::to_string(&Palette::Lava).unwrap(), "\"Lava\"");
        let format: TimeFormat = serde_json::from_str("\"%H %M\"").unwrap();
        assert_eq!(format, TimeFormat::HourMinuteBlink);
        assert!(serde_json::from_str::<DateFormat>("\"%Y\"").is_err());
    }
}
