//! Where the device lives and how to talk to it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Prefix shared by all environment variables read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "AWTRIX_HTTP_CLIENT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no base url configured, set AWTRIX_HTTP_CLIENT_BASE_URL or AWTRIX_HTTP_CLIENT_AWTRIX")]
    MissingBaseUrl,

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("malformed AWTRIX_HTTP_CLIENT_AWTRIX: {0}")]
    Json(#[source] serde_json::Error),

    #[error("cannot load dotenv file: {0}")]
    DotEnv(#[source] dotenvy::Error),

    #[error("invalid tls verification setting {0:?}")]
    InvalidVerify(String),

    #[error("cannot read CA bundle {path:?}: {source}")]
    CaBundleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CA bundle {path:?}: {source}")]
    CaBundle {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
}

/// How the server certificate is checked on `https` base URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TlsVerify {
    /// Accept any certificate. The device ships a self-signed one.
    #[default]
    Disabled,
    /// Verify against the built-in root store.
    System,
    /// Verify against the PEM certificate(s) in this file.
    CaBundle(PathBuf),
}

impl TlsVerify {
    /// `true`/`false` (also `1`/`0`, `yes`/`no`), anything else is a CA bundle path.
    pub fn parse(value: &str) -> Result<TlsVerify, ConfigError> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "" => Err(ConfigError::InvalidVerify(value.to_string())),
            "true" | "1" | "yes" | "on" => Ok(TlsVerify::System),
            "false" | "0" | "no" | "off" => Ok(TlsVerify::Disabled),
            _ => Ok(TlsVerify::CaBundle(PathBuf::from(value))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VerifySetting {
    Flag(bool),
    Path(String),
}

/// Contents of the `AWTRIX_HTTP_CLIENT_AWTRIX` JSON blob.
#[derive(Deserialize, Default)]
struct ConfigBlob {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    verify_ssl: Option<VerifySetting>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
    verify: TlsVerify,
}

impl ClientConfig {
    /// Only `http` and `https` urls with a host are accepted. The API is
    /// expected under `api/` below this url.
    pub fn new(base_url: &str) -> Result<ClientConfig, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        return Ok(ClientConfig {
            base_url: url,
            username: None,
            password: None,
            verify: TlsVerify::default(),
        });
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_verify(mut self, verify: TlsVerify) -> Self {
        self.verify = verify;
        self
    }

    /// Read the configuration from the process environment, falling back to
    /// a `.env` file in the current directory or one of its parents.
    ///
    /// Real environment variables win over the file. The process environment
    /// is never modified.
    pub fn from_env() -> Result<ClientConfig, ConfigError> {
        let dotenv = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter)?,
            Err(err) if err.not_found() => HashMap::new(),
            Err(err) => return Err(ConfigError::DotEnv(err)),
        };
        return ClientConfig::from_env_and(dotenv);
    }

    /// Like [`ClientConfig::from_env`], with an explicit dotenv file that
    /// must exist.
    pub fn from_env_file(path: &Path) -> Result<ClientConfig, ConfigError> {
        let iter = dotenvy::from_path_iter(path).map_err(ConfigError::DotEnv)?;
        return ClientConfig::from_env_and(collect_dotenv(iter)?);
    }

    fn from_env_and(dotenv: HashMap<String, String>) -> Result<ClientConfig, ConfigError> {
        log::debug!("{} variables from dotenv", dotenv.len());
        return ClientConfig::from_lookup(|key| {
            std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
        });
    }

    /// Like [`ClientConfig::from_env`], with variables resolved by `lookup`.
    ///
    /// `AWTRIX_HTTP_CLIENT_AWTRIX` may hold the whole configuration as JSON;
    /// `_BASE_URL`, `_USERNAME`, `_PASSWORD` and `_VERIFY_SSL` override its
    /// fields one by one.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<ClientConfig, ConfigError> {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.is_empty());

        let blob = match var("AWTRIX") {
            Some(json) => serde_json::from_str::<ConfigBlob>(&json).map_err(ConfigError::Json)?,
            None => ConfigBlob::default(),
        };

        let base_url = var("BASE_URL")
            .or(blob.base_url)
            .ok_or(ConfigError::MissingBaseUrl)?;
        let mut config = ClientConfig::new(&base_url)?;
        config.username = var("USERNAME").or(blob.username);
        config.password = var("PASSWORD").or(blob.password);
        config.verify = match (var("VERIFY_SSL"), blob.verify_ssl) {
            (Some(value), _) => TlsVerify::parse(&value)?,
            (None, Some(VerifySetting::Flag(true))) => TlsVerify::System,
            (None, Some(VerifySetting::Flag(false))) | (None, None) => TlsVerify::Disabled,
            (None, Some(VerifySetting::Path(path))) => TlsVerify::parse(&path)?,
        };
        return Ok(config);
    }

    pub fn base_url(&self) -> &Url {
        return &self.base_url;
    }

    pub fn verify(&self) -> &TlsVerify {
        return &self.verify;
    }

    /// Basic auth credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Full url of an API endpoint, e.g. `stats` or `notify/dismiss`.
    pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
        return self
            .base_url
            .join("api/")
            .and_then(|api| api.join(path))
            .map_err(|err| ConfigError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            });
    }
}

fn collect_dotenv<I>(iter: I) -> Result<HashMap<String, String>, ConfigError>
where
    I: Iterator<Item = Result<(String, String), dotenvy::Error>>,
{
    return iter.collect::<Result<_, _>>().map_err(ConfigError::DotEnv);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn nothing_configured() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("AWTRIX_HTTP_CLIENT_AWTRIX", r#"{"base_url": "test"}"#)]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        assert!(ClientConfig::new("mqtt://test.fr").is_err());
        assert!(ClientConfig::new("file:///tmp").is_err());
    }

    #[test]
    fn blob_without_auth() {
        let config =
            ClientConfig::from_lookup(lookup(&[("AWTRIX_HTTP_CLIENT_AWTRIX", r#"{"base_url": "http://test.fr"}"#)]))
                .unwrap();
        assert_eq!(config.base_url().as_str(), "http://test.fr/");
        assert_eq!(config.credentials(), None);
        assert_eq!(config.verify(), &TlsVerify::Disabled);
    }

    #[test]
    fn credentials_need_both_halves() {
        let config = ClientConfig::from_lookup(lookup(&[(
            "AWTRIX_HTTP_CLIENT_AWTRIX",
            r#"{"base_url": "http://test.fr", "username": "user"}"#,
        )]))
        .unwrap();
        assert_eq!(config.credentials(), None);

        let config = config.with_credentials("user", "secret");
        assert_eq!(config.credentials(), Some(("user", "secret")));
    }

    #[test]
    fn discrete_variables_override_blob() {
        let config = ClientConfig::from_lookup(lookup(&[
            (
                "AWTRIX_HTTP_CLIENT_AWTRIX",
                r#"{"base_url": "http://test.fr", "username": "a", "password": "b", "verify_ssl": true}"#,
            ),
            ("AWTRIX_HTTP_CLIENT_BASE_URL", "https://clock.lan"),
            ("AWTRIX_HTTP_CLIENT_PASSWORD", "c"),
            ("AWTRIX_HTTP_CLIENT_VERIFY_SSL", "/etc/awtrix.pem"),
        ]))
        .unwrap();
        assert_eq!(config.base_url().as_str(), "https://clock.lan/");
        assert_eq!(config.credentials(), Some(("a", "c")));
        assert_eq!(config.verify(), &TlsVerify::CaBundle(PathBuf::from("/etc/awtrix.pem")));
    }

    #[test]
    fn verify_from_blob() {
        let config = ClientConfig::from_lookup(lookup(&[(
            "AWTRIX_HTTP_CLIENT_AWTRIX",
            r#"{"base_url": "https://clock.lan", "verify_ssl": "ca.pem"}"#,
        )]))
        .unwrap();
        assert_eq!(config.verify(), &TlsVerify::CaBundle(PathBuf::from("ca.pem")));
    }

    #[test]
    fn malformed_blob() {
        let err = ClientConfig::from_lookup(lookup(&[("AWTRIX_HTTP_CLIENT_AWTRIX", "{")])).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn verify_literals() {
        assert_eq!(TlsVerify::parse("true").unwrap(), TlsVerify::System);
        assert_eq!(TlsVerify::parse("FALSE").unwrap(), TlsVerify::Disabled);
        assert_eq!(TlsVerify::parse("0").unwrap(), TlsVerify::Disabled);
        assert!(TlsVerify::parse("  ").is_err());
    }

    #[test]
    fn api_urls_live_under_api() {
        let config = ClientConfig::new("http://test/").unwrap();
        assert_eq!(config.api_url("stats").unwrap().as_str(), "http://test/api/stats");
        assert_eq!(
            config.api_url("notify/dismiss").unwrap().as_str(),
            "http://test/api/notify/dismiss"
        );

        let nested = ClientConfig::new("http://proxy.lan/awtrix").unwrap();
        assert_eq!(nested.api_url("loop").unwrap().as_str(), "http://proxy.lan/awtrix/api/loop");
    }

    #[test]
    fn dotenv_file_fills_in_missing_variables() {
        let path = std::env::temp_dir().join(format!("awtrix-config-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "AWTRIX_HTTP_CLIENT_BASE_URL=http://clock.from-file\n\
             AWTRIX_HTTP_CLIENT_USERNAME=user\n\
             AWTRIX_HTTP_CLIENT_PASSWORD=secret\n",
        )
        .unwrap();
        let config = ClientConfig::from_env_file(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.base_url().as_str(), "http://clock.from-file/");
        assert_eq!(config.credentials(), Some(("user", "secret")));
        assert_eq!(std::env::var("AWTRIX_HTTP_CLIENT_USERNAME").ok(), None);
    }

    #[test]
    fn missing_dotenv_file_is_an_error() {
        let path = std::env::temp_dir().join("awtrix-config-does-not-exist.env");
        let err = ClientConfig::from_env_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::DotEnv(_)));
    }
}
