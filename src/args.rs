use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::color::Color;
use crate::config::{ClientConfig, ConfigError};

/// Command line remote control for an AWTRIX Light pixel clock.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base url of the device, e.g. `http://192.168.1.42`.
    #[clap(short, long, env = "AWTRIX_HTTP_CLIENT_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for HTTP basic auth.
    #[clap(short, long, env = "AWTRIX_HTTP_CLIENT_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP basic auth.
    #[clap(short, long, env = "AWTRIX_HTTP_CLIENT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// `true`, `false` or the path of a PEM CA bundle.
    #[clap(long, env = "AWTRIX_HTTP_CLIENT_VERIFY_SSL")]
    pub verify_ssl: Option<String>,

    #[clap(subcommand)]
    pub action: Action,
}

impl CliArgs {
    /// Flags first, then the `AWTRIX_HTTP_CLIENT_AWTRIX` JSON blob.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let flags = [
            ("AWTRIX_HTTP_CLIENT_BASE_URL", &self.base_url),
            ("AWTRIX_HTTP_CLIENT_USERNAME", &self.username),
            ("AWTRIX_HTTP_CLIENT_PASSWORD", &self.password),
            ("AWTRIX_HTTP_CLIENT_VERIFY_SSL", &self.verify_ssl),
        ];
        return ClientConfig::from_lookup(|key| {
            match flags.iter().find(|(name, _)| *name == key) {
                Some((_, value)) => (*value).clone(),
                None => std::env::var(key).ok(),
            }
        });
    }
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print battery, sensor and firmware statistics.
    Stats,

    /// Print the 256 pixel colors currently on the matrix.
    Screen,

    /// Print the app rotation in display order.
    Loop,

    /// List the effects the firmware knows.
    Effects,

    /// List the transitions the firmware knows.
    Transitions,

    /// Turn the matrix on or off.
    Power { state: PowerState },

    /// Send the device into deep sleep.
    Sleep { seconds: u32 },

    /// Play a melody file from the MELODIES folder.
    Sound { name: String },

    /// Play an RTTTL melody.
    Rtttl { melody: String },

    /// Show a one-off notification.
    Notify {
        text: String,

        #[clap(short, long)]
        color: Option<Color>,

        /// Icon id or file name.
        #[clap(short, long)]
        icon: Option<String>,

        /// Seconds on screen.
        #[clap(short, long)]
        duration: Option<u32>,

        /// Keep it on screen until dismissed.
        #[clap(long)]
        hold: bool,

        #[clap(long)]
        sound: Option<String>,
    },

    /// Dismiss a held notification.
    Dismiss,

    /// Switch to the next app.
    Next,

    /// Switch to the previous app.
    Previous,

    /// Switch to the app with this name.
    Switch { name: String },

    /// Light one of the three indicators, or hide it when no color is given.
    Indicator {
        /// 1 (upper right), 2 (right) or 3 (lower right).
        number: u8,

        color: Option<Color>,

        /// Blink interval in milliseconds.
        #[clap(long)]
        blink: Option<u32>,

        /// Fade interval in milliseconds.
        #[clap(long)]
        fade: Option<u32>,
    },

    /// Fill the matrix with one color or color temperature. Without
    /// arguments the moodlight is turned off.
    Moodlight {
        #[clap(short, long)]
        brightness: Option<u8>,

        #[clap(short, long)]
        kelvin: Option<u32>,

        #[clap(short, long)]
        color: Option<Color>,
    },

    /// Print the device settings.
    Settings,

    /// Restart the device.
    Reboot,

    /// Install a firmware update if one is available.
    Update,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl FromStr for PowerState {
    type Err = String;

    fn from_str(s: &str) -> Result<PowerState, String> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(PowerState::On),
            "off" | "false" | "0" => Ok(PowerState::Off),
            _ => Err(format!("expected on or off, got {:?}", s)),
        }
    }
}

impl PowerState {
    pub fn is_on(&self) -> bool {
        return *self == PowerState::On;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_notify() {
        let args = CliArgs::parse_from([
            "awtrix",
            "--base-url",
            "http://clock.lan",
            "notify",
            "Hello",
            "--color",
            "#FF0000",
            "--hold",
        ]);
        assert_eq!(args.base_url.as_deref(), Some("http://clock.lan"));
        match args.action {
            Action::Notify {
                text, color, hold, ..
            } => {
                assert_eq!(text, "Hello");
                assert_eq!(color, Some(Color::rgb(0xff, 0, 0)));
                assert!(hold);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn parses_power() {
        let args = CliArgs::parse_from(["awtrix", "-b", "http://clock.lan", "power", "off"]);
        match args.action {
            Action::Power { state } => assert!(!state.is_on()),
            other => panic!("unexpected action {:?}", other),
        }
        assert!(CliArgs::try_parse_from(["awtrix", "power", "maybe"]).is_err());
    }

    #[test]
    fn flags_build_the_config() {
        let args = CliArgs::parse_from([
            "awtrix",
            "-b",
            "http://clock.lan",
            "-u",
            "user",
            "-p",
            "secret",
            "--verify-ssl",
            "true",
            "stats",
        ]);
        let config = args.client_config().unwrap();
        assert_eq!(config.base_url().as_str(), "http://clock.lan/");
        assert_eq!(config.credentials(), Some(("user", "secret")));
        assert_eq!(config.verify(), &crate::config::TlsVerify::System);
    }
}
