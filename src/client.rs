use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::application::{CustomApplication, Notification};
use crate::config::{ClientConfig, ConfigError, TlsVerify};
use crate::error::Error;
use crate::indicator::{Indicator, IndicatorState};
use crate::moodlight::Moodlight;
use crate::response::{parse_effects, parse_transitions, Loop, Screen, Stats};
use crate::settings::Settings;
use crate::vocabulary::{EffectType, TransitionType};

/// Blocking handle to one device.
///
/// Every call is a single HTTP request; nothing is cached or retried.
pub struct AwtrixClient {
    http: Client,
    config: ClientConfig,
}

impl AwtrixClient {
    pub fn new(config: ClientConfig) -> Result<AwtrixClient, Error> {
        let mut builder = Client::builder();
        builder = match config.verify() {
            TlsVerify::Disabled => builder.danger_accept_invalid_certs(true),
            TlsVerify::System => builder,
            TlsVerify::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|source| ConfigError::CaBundleRead {
                    path: path.clone(),
                    source,
                })?;
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|source| ConfigError::CaBundle {
                    path: path.clone(),
                    source,
                })?;
                builder.add_root_certificate(cert)
            }
        };
        let http = builder.build()?;
        return Ok(AwtrixClient { http, config });
    }

    pub fn from_env() -> Result<AwtrixClient, Error> {
        return AwtrixClient::new(ClientConfig::from_env()?);
    }

    pub fn config(&self) -> &ClientConfig {
        return &self.config;
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let url = self.config.api_url(path)?;
        let mut request = self.http.request(method, url);
        if let Some((username, password)) = self.config.credentials() {
            request = request.basic_auth(username, Some(password));
        }
        return Ok(request);
    }

    /// Send the request and return the body of a 2xx answer.
    fn execute(&self, request: RequestBuilder) -> Result<String, Error> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("{} {}", method, url);

        let response = self.http.execute(request)?;
        let status = response.status();
        let body = response.text()?;
        debug!("{} {} -> {}", method, url, status);
        if !status.is_success() {
            warn!("{} {} failed with {}: {}", method, url, status, body);
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        return Ok(body);
    }

    fn get(&self, path: &str) -> Result<String, Error> {
        return self.execute(self.request(Method::GET, path)?);
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), Error> {
        if log::log_enabled!(log::Level::Debug) {
            debug!("payload for {}: {}", path, serde_json::to_string(body).unwrap_or_default());
        }
        self.execute(self.request(Method::POST, path)?.json(body))?;
        return Ok(());
    }

    fn post_empty(&self, path: &str) -> Result<(), Error> {
        self.execute(self.request(Method::POST, path)?)?;
        return Ok(());
    }

    // Read-only endpoints.

    pub fn stats(&self) -> Result<Stats, Error> {
        return Ok(Stats::from_json(&self.get("stats")?)?);
    }

    pub fn effects(&self) -> Result<Vec<EffectType>, Error> {
        return Ok(parse_effects(&self.get("effects")?)?);
    }

    pub fn transitions(&self) -> Result<Vec<TransitionType>, Error> {
        return Ok(parse_transitions(&self.get("transitions")?)?);
    }

    /// App rotation, in display order.
    pub fn loop_apps(&self) -> Result<Loop, Error> {
        return Ok(Loop::from_json(&self.get("loop")?)?);
    }

    pub fn screen(&self) -> Result<Screen, Error> {
        return Ok(Screen::from_json(&self.get("screen")?)?);
    }

    // Commands.

    pub fn set_power(&self, on: bool) -> Result<(), Error> {
        return self.post("power", &json!({ "power": on }));
    }

    /// Deep sleep for `seconds`; the device wakes up on its own or by button.
    pub fn sleep(&self, seconds: u32) -> Result<(), Error> {
        return self.post("sleep", &json!({ "sleep": seconds }));
    }

    /// Play a sound file from the `MELODIES` folder, without extension.
    pub fn play_sound(&self, sound: &str) -> Result<(), Error> {
        return self.post("sound", &json!({ "sound": sound }));
    }

    pub fn play_rtttl(&self, rtttl: &str) -> Result<(), Error> {
        return self.post("rtttl", &json!({ "rtttl": rtttl }));
    }

    pub fn set_moodlight(&self, moodlight: &Moodlight) -> Result<(), Error> {
        return self.post("moodlight", moodlight);
    }

    pub fn set_indicator(&self, indicator: Indicator, state: &IndicatorState) -> Result<(), Error> {
        return self.post(&indicator.path(), state);
    }

    pub fn hide_indicator(&self, indicator: Indicator) -> Result<(), Error> {
        return self.set_indicator(indicator, &IndicatorState::hidden());
    }

    /// Create or replace the custom app `name`.
    pub fn set_custom_app(&self, name: &str, app: &CustomApplication) -> Result<(), Error> {
        return self.post_custom(name, Some(app));
    }

    /// Several pages under one name; the device suffixes them `name0`, `name1`, ...
    pub fn set_custom_apps(&self, name: &str, apps: &[CustomApplication]) -> Result<(), Error> {
        return self.post_custom(name, Some(apps));
    }

    /// Removes every custom app whose name starts with `name`.
    pub fn remove_custom_app(&self, name: &str) -> Result<(), Error> {
        return self.post_custom::<()>(name, None);
    }

    fn post_custom<B: Serialize + ?Sized>(&self, name: &str, body: Option<&B>) -> Result<(), Error> {
        let mut request = self.request(Method::POST, "custom")?.query(&[("name", name)]);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request)?;
        return Ok(());
    }

    pub fn notify(&self, notification: &Notification) -> Result<(), Error> {
        return self.post("notify", notification);
    }

    /// Dismiss a notification shown with `hold`.
    pub fn dismiss_notification(&self) -> Result<(), Error> {
        return self.post_empty("notify/dismiss");
    }

    pub fn next_app(&self) -> Result<(), Error> {
        return self.post_empty("nextapp");
    }

    pub fn previous_app(&self) -> Result<(), Error> {
        return self.post_empty("previousapp");
    }

    pub fn switch_app(&self, name: &str) -> Result<(), Error> {
        return self.post("switch", &json!({ "name": name }));
    }

    pub fn settings(&self) -> Result<Settings, Error> {
        return Ok(Settings::from_json(&self.get("settings")?)?);
    }

    /// Only the keys set in `settings` are changed on the device.
    pub fn set_settings(&self, settings: &Settings) -> Result<(), Error> {
        return self.post("settings", settings);
    }

    // Maintenance.

    pub fn update_firmware(&self) -> Result<(), Error> {
        return self.post_empty("doupdate");
    }

    pub fn reboot(&self) -> Result<(), Error> {
        return self.post_empty("reboot");
    }

    /// Formats the flash and wipes the wifi credentials.
    pub fn erase(&self) -> Result<(), Error> {
        return self.post_empty("erase");
    }

    pub fn reset_settings(&self) -> Result<(), Error> {
        return self.post_empty("resetSettings");
    }
}
