//! Models for what the device sends back from its read-only endpoints.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Color;
use crate::error::{decode_json, DecodeError};
use crate::vocabulary::{EffectType, TransitionType};

pub const MATRIX_WIDTH: usize = 32;
pub const MATRIX_HEIGHT: usize = 8;
pub const SCREEN_PIXELS: usize = MATRIX_WIDTH * MATRIX_HEIGHT;

/// Telemetry from `GET /api/stats`. Every field is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Battery level in percent.
    pub bat: i64,
    pub bat_raw: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    pub lux: i64,
    pub ldr_raw: i64,
    /// Free heap in bytes.
    pub ram: i64,
    pub bri: i64,
    pub temp: i64,
    pub hum: i64,
    /// Seconds since boot.
    pub uptime: i64,
    pub wifi_signal: i64,
    pub messages: i64,
    pub version: String,
    pub indicator1: bool,
    pub indicator2: bool,
    pub indicator3: bool,
    /// Name of the app currently on screen.
    pub app: String,
    pub uid: String,
    pub matrix: bool,
}

impl Stats {
    pub fn from_json(body: &str) -> Result<Stats, DecodeError> {
        return decode_json("stats", body);
    }
}

/// Snapshot of the 32x8 matrix, row by row from the top left pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pixels: Vec<Color>,
}

impl Screen {
    pub fn from_ints(values: &[u32]) -> Result<Screen, DecodeError> {
        if values.len() != SCREEN_PIXELS {
            return Err(DecodeError::ScreenLength {
                expected: SCREEN_PIXELS,
                actual: values.len(),
            });
        }
        let pixels = values
            .iter()
            .map(|value| Color::from_int(*value))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Screen { pixels });
    }

    pub fn from_json(body: &str) -> Result<Screen, DecodeError> {
        let values: Vec<u32> = decode_json("screen", body)?;
        return Screen::from_ints(&values);
    }

    pub fn pixels(&self) -> &[Color] {
        return &self.pixels;
    }

    /// `None` outside of the matrix.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= MATRIX_WIDTH || y >= MATRIX_HEIGHT {
            return None;
        }
        return self.pixels.get(y * MATRIX_WIDTH + x).copied();
    }

    pub fn to_ints(&self) -> Vec<u32> {
        return self.pixels.iter().map(Color::to_int).collect();
    }
}

/// App rotation order from `GET /api/loop`.
///
/// The device reports `{name: position}`; only the names survive, sorted by
/// position. Apps sharing a position keep the order the device listed them in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Loop {
    apps: Vec<String>,
}

impl Loop {
    pub fn new(apps: Vec<String>) -> Loop {
        return Loop { apps };
    }

    pub fn from_json(body: &str) -> Result<Loop, DecodeError> {
        return decode_json("loop", body);
    }

    pub fn apps(&self) -> &[String] {
        return &self.apps;
    }

    pub fn len(&self) -> usize {
        return self.apps.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.apps.is_empty();
    }
}

struct LoopVisitor;

impl<'de> Visitor<'de> for LoopVisitor {
    type Value = Loop;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from app name to loop position")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Loop, A::Error> {
        let mut entries: Vec<(String, i64)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, position)) = access.next_entry::<String, i64>()? {
            entries.push((name, position));
        }
        // sort_by_key is stable
        entries.sort_by_key(|(_, position)| *position);
        Ok(Loop {
            apps: entries.into_iter().map(|(name, _)| name).collect(),
        })
    }
}

impl<'de> Deserialize<'de> for Loop {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Loop, D::Error> {
        deserializer.deserialize_map(LoopVisitor)
    }
}

/// Decode `GET /api/effects`. Names must match the device spelling exactly.
pub fn parse_effects(body: &str) -> Result<Vec<EffectType>, DecodeError> {
    let names: Vec<String> = decode_json("effects", body)?;
    let mut effects = Vec::with_capacity(names.len());
    for name in names {
        effects.push(name.parse::<EffectType>()?);
    }
    return Ok(effects);
}

/// Decode `GET /api/transitions`. The device capitalizes names differently
/// from the symbolic ones (`Slide` vs `SLIDE`), so matching ignores case.
pub fn parse_transitions(body: &str) -> Result<Vec<TransitionType>, DecodeError> {
    let names: Vec<String> = decode_json("transitions", body)?;
    let mut transitions = Vec::with_capacity(names.len());
    for name in names {
        transitions.push(TransitionType::from_name(&name)?);
    }
    return Ok(transitions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_decode() {
        let body = json!({
            "bat": 52,
            "bat_raw": 574,
            "type": 0,
            "lux": 0,
            "ldr_raw": 79,
            "ram": 144524,
            "bri": 120,
            "temp": 26,
            "hum": 45,
            "uptime": 461,
            "wifi_signal": -53,
            "messages": 0,
            "version": "0.90",
            "indicator1": false,
            "indicator2": false,
            "indicator3": false,
            "app": "Time",
            "uid": "awtrix_fa9b04",
            "matrix": true
        });
        let stats = Stats::from_json(&body.to_string()).unwrap();
        assert_eq!(stats.wifi_signal, -53);
        assert_eq!(stats.kind, 0);
        assert_eq!(stats.app, "Time");
        assert!(stats.matrix);
        assert_eq!(serde_json::to_value(&stats).unwrap(), body);
    }

    #[test]
    fn stats_missing_field_fails() {
        let err = Stats::from_json(r#"{"bat": 52}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json { what: "stats", .. }));
    }

    #[test]
    fn screen_requires_256_pixels() {
        let short = serde_json::to_string(&vec![0u32; 255]).unwrap();
        assert!(matches!(
            Screen::from_json(&short).unwrap_err(),
            DecodeError::ScreenLength {
                expected: 256,
                actual: 255
            }
        ));
        let long = serde_json::to_string(&vec![0u32; 257]).unwrap();
        assert!(Screen::from_json(&long).is_err());
    }

    #[test]
    fn screen_rejects_wide_pixels() {
        let mut values = vec![0u32; SCREEN_PIXELS];
        values[3] = 0x1000000;
        assert!(matches!(
            Screen::from_ints(&values).unwrap_err(),
            DecodeError::Pixel(_)
        ));
    }

    #[test]
    fn screen_is_row_major() {
        let mut values = vec![0u32; SCREEN_PIXELS];
        values[2] = 65280;
        values[MATRIX_WIDTH + 3] = 77826;
        values[SCREEN_PIXELS - 1] = 16777215;
        let screen = Screen::from_json(&serde_json::to_string(&values).unwrap()).unwrap();
        assert_eq!(screen.pixel(2, 0), Some(Color::rgb(0, 0xff, 0)));
        assert_eq!(screen.pixel(3, 1), Some(Color::from_int(77826).unwrap()));
        assert_eq!(screen.pixel(31, 7), Some(Color::WHITE));
        assert_eq!(screen.pixel(32, 0), None);
        assert_eq!(screen.pixel(0, 8), None);
        assert_eq!(screen.to_ints(), values);
    }

    #[test]
    fn loop_sorted_by_position() {
        let apps = Loop::from_json(r#"{"Time":0,"Temperature":1,"Humidity":2,"Battery":3}"#).unwrap();
        assert_eq!(apps.apps(), ["Time", "Temperature", "Humidity", "Battery"]);

        let shuffled = Loop::from_json(r#"{"Battery":3,"Time":0,"Humidity":2,"Temperature":1}"#).unwrap();
        assert_eq!(shuffled, apps);
    }

    #[test]
    fn loop_ties_keep_device_order() {
        let apps = Loop::from_json(r#"{"b":1,"a":0,"c":1,"d":0}"#).unwrap();
        assert_eq!(apps.apps(), ["a", "d", "b", "c"]);
    }

    #[test]
    fn loop_rejects_non_integer_positions() {
        assert!(Loop::from_json(r#"{"Time":"first"}"#).is_err());
        assert!(Loop::from_json(r#"["Time"]"#).is_err());
    }

    #[test]
    fn effects_match_exactly() {
        let effects = parse_effects(r#"["Fade","PingPong","BrickBreaker","ColorWaves"]"#).unwrap();
        assert_eq!(
            effects,
            vec![
                EffectType::Fade,
                EffectType::PingPong,
                EffectType::BrickBreaker,
                EffectType::ColorWaves
            ]
        );
        let err = parse_effects(r#"["pingpong"]"#).unwrap_err();
        assert!(matches!(err, DecodeError::Unknown(_)));
    }

    #[test]
    fn transitions_ignore_case() {
        let transitions = parse_transitions(r#"["Random","Slide","Fade"]"#).unwrap();
        assert_eq!(
            transitions,
            vec![TransitionType::Random, TransitionType::Slide, TransitionType::Fade]
        );
        assert!(parse_transitions(r#"["Teleport"]"#).is_err());
    }
}
