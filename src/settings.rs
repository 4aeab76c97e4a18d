//! Device settings, read from and written to `/api/settings`.
//!
//! Wire keys are the firmware's upper-case names (`TCOL`, `TMODE`, ...).
//! Colors travel in three shapes depending on the key: packed integers,
//! hex strings, and integers where `0` stands for "use the global text
//! color" ([`AppColor::UseGlobal`]).

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::{int_form, Color, ColorInput};
use crate::error::{decode_json, DecodeError, ValidationError};
use crate::vocabulary::{DateFormat, TimeFormat, TransitionType};

/// Text color of a built-in app.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppColor {
    /// Follow the global text color (`TCOL`). Sent as `0`.
    UseGlobal,
    Color(Color),
}

impl From<Color> for AppColor {
    fn from(color: Color) -> AppColor {
        return AppColor::Color(color);
    }
}

impl Serialize for AppColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AppColor::UseGlobal => serializer.serialize_u32(0),
            AppColor::Color(color) => serializer.serialize_u32(color.to_int()),
        }
    }
}

impl<'de> Deserialize<'de> for AppColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<AppColor, D::Error> {
        match ColorInput::deserialize(deserializer)? {
            ColorInput::Int(0) => Ok(AppColor::UseGlobal),
            input => input.into_color().map(AppColor::Color).map_err(de::Error::custom),
        }
    }
}

/// The wire shape of [`Settings`], before any checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct SettingsFields {
    #[serde(rename = "ATIME", skip_serializing_if = "Option::is_none")]
    app_time: Option<u32>,
    #[serde(rename = "TEFF", skip_serializing_if = "Option::is_none")]
    transition_effect: Option<TransitionType>,
    #[serde(rename = "TSPEED", skip_serializing_if = "Option::is_none")]
    transition_speed: Option<u32>,
    #[serde(rename = "TCOL", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    text_color: Option<Color>,
    #[serde(rename = "TMODE", skip_serializing_if = "Option::is_none")]
    time_mode: Option<u8>,
    #[serde(rename = "CHCOL", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    calendar_header_color: Option<Color>,
    #[serde(rename = "CBCOL", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    calendar_body_color: Option<Color>,
    #[serde(rename = "CTCOL", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    calendar_text_color: Option<Color>,
    #[serde(rename = "WD", skip_serializing_if = "Option::is_none")]
    weekday: Option<bool>,
    #[serde(rename = "WDCA", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    weekday_active_color: Option<Color>,
    #[serde(rename = "WDCI", default, with = "int_form", skip_serializing_if = "Option::is_none")]
    weekday_inactive_color: Option<Color>,
    #[serde(rename = "BRI", skip_serializing_if = "Option::is_none")]
    brightness: Option<u8>,
    #[serde(rename = "ABRI", skip_serializing_if = "Option::is_none")]
    auto_brightness: Option<bool>,
    #[serde(rename = "ATRANS", skip_serializing_if = "Option::is_none")]
    auto_transition: Option<bool>,
    #[serde(rename = "CCORRECTION", skip_serializing_if = "Option::is_none")]
    color_correction: Option<Color>,
    #[serde(rename = "CTEMP", skip_serializing_if = "Option::is_none")]
    color_temperature: Option<Color>,
    #[serde(rename = "TFORMAT", skip_serializing_if = "Option::is_none")]
    time_format: Option<TimeFormat>,
    #[serde(rename = "DFORMAT", skip_serializing_if = "Option::is_none")]
    date_format: Option<DateFormat>,
    #[serde(rename = "SOM", skip_serializing_if = "Option::is_none")]
    start_on_monday: Option<bool>,
    #[serde(rename = "CEL", skip_serializing_if = "Option::is_none")]
    celsius: Option<bool>,
    #[serde(rename = "MAT", skip_serializing_if = "Option::is_none")]
    matrix_layout: Option<u8>,
    #[serde(rename = "SOUND", skip_serializing_if = "Option::is_none")]
    sound: Option<bool>,
    #[serde(rename = "GAMMA", skip_serializing_if = "Option::is_none")]
    gamma: Option<f64>,
    #[serde(rename = "BLOCKN", skip_serializing_if = "Option::is_none")]
    block_navigation: Option<bool>,
    #[serde(rename = "UPPERCASE", skip_serializing_if = "Option::is_none")]
    uppercase: Option<bool>,
    #[serde(rename = "TIME_COL", skip_serializing_if = "Option::is_none")]
    time_color: Option<AppColor>,
    #[serde(rename = "DATE_COL", skip_serializing_if = "Option::is_none")]
    date_color: Option<AppColor>,
    #[serde(rename = "TEMP_COL", skip_serializing_if = "Option::is_none")]
    temperature_color: Option<AppColor>,
    #[serde(rename = "HUM_COL", skip_serializing_if = "Option::is_none")]
    humidity_color: Option<AppColor>,
    #[serde(rename = "BAT_COL", skip_serializing_if = "Option::is_none")]
    battery_color: Option<AppColor>,
    #[serde(rename = "SSPEED", skip_serializing_if = "Option::is_none")]
    scroll_speed: Option<u8>,
    #[serde(rename = "TIM", skip_serializing_if = "Option::is_none")]
    time_app: Option<bool>,
    #[serde(rename = "DAT", skip_serializing_if = "Option::is_none")]
    date_app: Option<bool>,
    #[serde(rename = "HUM", skip_serializing_if = "Option::is_none")]
    humidity_app: Option<bool>,
    #[serde(rename = "TEMP", skip_serializing_if = "Option::is_none")]
    temperature_app: Option<bool>,
    #[serde(rename = "BAT", skip_serializing_if = "Option::is_none")]
    battery_app: Option<bool>,
    #[serde(rename = "MATP", skip_serializing_if = "Option::is_none")]
    matrix_enabled: Option<bool>,
    #[serde(rename = "VOL", skip_serializing_if = "Option::is_none")]
    volume: Option<u8>,
}

impl SettingsFields {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range("TMODE", self.time_mode.map(i64::from), 0, 4)?;
        ValidationError::check_range("SSPEED", self.scroll_speed.map(i64::from), 0, 100)?;
        ValidationError::check_range("VOL", self.volume.map(i64::from), 0, 30)?;
        let app_colors = [
            ("TIME_COL", self.time_color),
            ("DATE_COL", self.date_color),
            ("TEMP_COL", self.temperature_color),
            ("HUM_COL", self.humidity_color),
            ("BAT_COL", self.battery_color),
        ];
        for (field, color) in app_colors {
            // Black packs to 0, which the device reads as `UseGlobal`.
            if matches!(color, Some(AppColor::Color(color)) if color.to_int() == 0) {
                return Err(ValidationError::BlackAppColor { field });
            }
        }
        return Ok(());
    }
}

/// Device settings. Every value, built or decoded, has passed the range
/// checks of [`SettingsBuilder::build`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Settings {
    fields: SettingsFields,
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Settings, D::Error> {
        let fields = SettingsFields::deserialize(deserializer)?;
        fields.validate().map_err(de::Error::custom)?;
        Ok(Settings { fields })
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        return SettingsBuilder::default();
    }

    /// Parse the body of `GET /api/settings`. Unknown keys are ignored,
    /// out of range values are not.
    pub fn from_json(body: &str) -> Result<Settings, DecodeError> {
        return decode_json("settings", body);
    }
}

#[derive(Clone, Debug, Default)]
pub struct SettingsBuilder {
    fields: SettingsFields,
}

impl SettingsBuilder {
    pub fn build(self) -> Result<Settings, ValidationError> {
        self.fields.validate()?;
        return Ok(Settings { fields: self.fields });
    }
}

/// Getters on `Settings` and setters on `SettingsBuilder` for every key.
macro_rules! settings_accessors {
    ($($(#[$meta:meta])* $field:ident: $ty:ty $(= $arg:ty)?,)*) => {
        impl Settings {
            $(
                $(#[$meta])*
                pub fn $field(&self) -> Option<$ty> {
                    self.fields.$field
                }
            )*
        }

        impl SettingsBuilder {
            $(
                $(#[$meta])*
                pub fn $field(mut self, value: setter_arg!($ty $(, $arg)?)) -> Self {
                    self.fields.$field = Some(value.into());
                    self
                }
            )*
        }
    };
}

/// Setters take the stored type unless the key lists a wider argument.
macro_rules! setter_arg {
    ($ty:ty) => { $ty };
    ($ty:ty, $arg:ty) => { $arg };
}

settings_accessors! {
    /// `ATIME`: seconds each app stays on screen.
    app_time: u32,
    /// `TEFF`: animation between apps.
    transition_effect: TransitionType,
    /// `TSPEED`: transition duration in milliseconds.
    transition_speed: u32,
    /// `TCOL`: global text color.
    text_color: Color,
    /// `TMODE`: time app style, 0..=4.
    time_mode: u8,
    /// `CHCOL`
    calendar_header_color: Color,
    /// `CBCOL`
    calendar_body_color: Color,
    /// `CTCOL`
    calendar_text_color: Color,
    /// `WD`: show the weekday bar.
    weekday: bool,
    /// `WDCA`
    weekday_active_color: Color,
    /// `WDCI`
    weekday_inactive_color: Color,
    /// `BRI`: matrix brightness.
    brightness: u8,
    /// `ABRI`
    auto_brightness: bool,
    /// `ATRANS`: switch to the next app automatically.
    auto_transition: bool,
    /// `CCORRECTION`
    color_correction: Color,
    /// `CTEMP`
    color_temperature: Color,
    /// `TFORMAT`
    time_format: TimeFormat,
    /// `DFORMAT`
    date_format: DateFormat,
    /// `SOM`
    start_on_monday: bool,
    /// `CEL`: temperature in celsius.
    celsius: bool,
    /// `MAT`: matrix wiring layout.
    matrix_layout: u8,
    /// `SOUND`
    sound: bool,
    /// `GAMMA`
    gamma: f64,
    /// `BLOCKN`: block the physical keys (still reported over MQTT).
    block_navigation: bool,
    /// `UPPERCASE`
    uppercase: bool,
    /// `TIME_COL`
    time_color: AppColor = impl Into<AppColor>,
    /// `DATE_COL`
    date_color: AppColor = impl Into<AppColor>,
    /// `TEMP_COL`
    temperature_color: AppColor = impl Into<AppColor>,
    /// `HUM_COL`
    humidity_color: AppColor = impl Into<AppColor>,
    /// `BAT_COL`
    battery_color: AppColor = impl Into<AppColor>,
    /// `SSPEED`: scroll speed in percent, 0..=100.
    scroll_speed: u8,
    /// `TIM`: native time app, needs a reboot.
    time_app: bool,
    /// `DAT`
    date_app: bool,
    /// `HUM`
    humidity_app: bool,
    /// `TEMP`
    temperature_app: bool,
    /// `BAT`
    battery_app: bool,
    /// `MATP`: matrix on/off without the power animation.
    matrix_enabled: bool,
    /// `VOL`: DFPlayer volume, 0..=30.
    volume: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_settings() -> serde_json::Value {
        json!({
            "MATP": true,
            "ABRI": false,
            "BRI": 120,
            "ATRANS": true,
            "TCOL": 16777215,
            "TEFF": 1,
            "TSPEED": 400,
            "ATIME": 7,
            "TMODE": 1,
            "CHCOL": 16711680,
            "CTCOL": 0,
            "CBCOL": 16777215,
            "TFORMAT": "%H %M",
            "DFORMAT": "%d.%m.%y",
            "SOM": true,
            "CEL": true,
            "BLOCKN": false,
            "MAT": 0,
            "SOUND": true,
            "GAMMA": 1.899999976,
            "UPPERCASE": true,
            "CCORRECTION": "#000000",
            "CTEMP": "#000000",
            "WD": true,
            "WDCA": 16777215,
            "WDCI": 6710886,
            "TIME_COL": 0,
            "DATE_COL": 0,
            "HUM_COL": 0,
            "TEMP_COL": 0,
            "BAT_COL": 0,
            "SSPEED": 100,
            "TIM": true,
            "DAT": false,
            "HUM": true,
            "TEMP": true,
            "BAT": true
        })
    }

    #[test]
    fn decodes_device_response() {
        let settings = Settings::from_json(&device_settings().to_string()).unwrap();
        assert_eq!(settings.text_color(), Some(Color::WHITE));
        assert_eq!(settings.transition_effect(), Some(TransitionType::Slide));
        assert_eq!(settings.calendar_header_color(), Some(Color::rgb(0xff, 0, 0)));
        assert_eq!(settings.calendar_text_color(), Some(Color::BLACK));
        assert_eq!(settings.weekday_inactive_color(), Some(Color::rgb(0x66, 0x66, 0x66)));
        assert_eq!(settings.color_correction(), Some(Color::BLACK));
        assert_eq!(settings.time_format(), Some(TimeFormat::HourMinuteBlink));
        assert_eq!(settings.time_color(), Some(AppColor::UseGlobal));
        assert_eq!(settings.gamma(), Some(1.899999976));
        assert_eq!(settings.volume(), None);
    }

    #[test]
    fn device_response_round_trips() {
        let settings = Settings::from_json(&device_settings().to_string()).unwrap();
        assert_eq!(serde_json::to_value(&settings).unwrap(), device_settings());
    }

    #[test]
    fn builder_matches_decoded() {
        let built = Settings::builder()
            .app_time(7)
            .transition_effect(TransitionType::Slide)
            .transition_speed(400)
            .text_color(Color::WHITE)
            .time_mode(1)
            .calendar_header_color(Color::rgb(0xff, 0, 0))
            .calendar_body_color(Color::WHITE)
            .calendar_text_color(Color::BLACK)
            .weekday(true)
            .weekday_active_color(Color::WHITE)
            .weekday_inactive_color(Color::rgb(0x66, 0x66, 0x66))
            .brightness(120)
            .auto_brightness(false)
            .auto_transition(true)
            .color_correction(Color::BLACK)
            .color_temperature(Color::BLACK)
            .time_format(TimeFormat::HourMinuteBlink)
            .date_format(DateFormat::DayMonthYearDots)
            .start_on_monday(true)
            .celsius(true)
            .matrix_layout(0)
            .sound(true)
            .gamma(1.899999976)
            .block_navigation(false)
            .uppercase(true)
            .time_color(AppColor::UseGlobal)
            .date_color(AppColor::UseGlobal)
            .temperature_color(AppColor::UseGlobal)
            .humidity_color(AppColor::UseGlobal)
            .battery_color(AppColor::UseGlobal)
            .scroll_speed(100)
            .time_app(true)
            .date_app(false)
            .humidity_app(true)
            .temperature_app(true)
            .battery_app(true)
            .matrix_enabled(true)
            .build()
            .unwrap();
        let decoded = Settings::from_json(&device_settings().to_string()).unwrap();
        assert_eq!(built, decoded);
    }

    #[test]
    fn integer_color_round_trips() {
        let settings = Settings::from_json(r#"{"TCOL": 16777215}"#).unwrap();
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({"TCOL": 16777215}));
    }

    #[test]
    fn app_color_keeps_use_global_apart_from_colors() {
        let settings = Settings::builder()
            .time_color(AppColor::UseGlobal)
            .date_color(Color::rgb(0, 0xff, 0))
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"TIME_COL": 0, "DATE_COL": 65280})
        );
        let decoded = Settings::from_json(r##"{"DATE_COL": "#00FF00"}"##).unwrap();
        assert_eq!(decoded.date_color(), Some(AppColor::Color(Color::rgb(0, 0xff, 0))));
    }

    #[test]
    fn empty_settings_serialize_empty() {
        let settings = Settings::builder().build().unwrap();
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({}));
    }

    #[test]
    fn ranges_are_checked() {
        assert!(Settings::builder().time_mode(5).build().is_err());
        assert!(Settings::builder().scroll_speed(101).build().is_err());
        assert!(Settings::builder().volume(31).build().is_err());
        assert!(Settings::builder().volume(30).build().is_ok());
    }

    #[test]
    fn unknown_transition_fails_decoding() {
        assert!(Settings::from_json(r#"{"TEFF": 42}"#).is_err());
        assert!(Settings::from_json(r#"{"TFORMAT": "%Y"}"#).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings = Settings::from_json(r#"{"BRI": 10, "NEWKEY": true}"#).unwrap();
        assert_eq!(settings.brightness(), Some(10));
    }

    #[test]
    fn black_app_color_is_rejected() {
        let err = Settings::builder().time_color(Color::BLACK).build().unwrap_err();
        assert_eq!(err, ValidationError::BlackAppColor { field: "TIME_COL" });
        let err = Settings::builder()
            .battery_color(Color::rgba(0, 0, 0, 0x80))
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::BlackAppColor { field: "BAT_COL" });

        let dark = Settings::builder().time_color(Color::rgb(0, 0, 1)).build().unwrap();
        let decoded = Settings::from_json(&serde_json::to_string(&dark).unwrap()).unwrap();
        assert_eq!(decoded.time_color(), Some(AppColor::Color(Color::rgb(0, 0, 1))));
    }

    #[test]
    fn decoding_checks_ranges() {
        let err = Settings::from_json(r#"{"TMODE": 9, "SSPEED": 250, "VOL": 99}"#).unwrap_err();
        assert!(err.to_string().contains("TMODE"), "{}", err);
        assert!(Settings::from_json(r#"{"SSPEED": 250}"#).is_err());
        assert!(Settings::from_json(r#"{"VOL": 31}"#).is_err());
        assert!(Settings::from_json(r##"{"DATE_COL": "#000000"}"##).is_err());
        assert!(serde_json::from_value::<Settings>(json!({"VOL": 99})).is_err());
    }

    #[test]
    fn numeric_setters_take_plain_literals() {
        let settings = Settings::builder()
            .app_time(7)
            .brightness(120)
            .volume(30)
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"ATIME": 7, "BRI": 120, "VOL": 30})
        );
    }
}
