//! Configuration for the lobby client.
//!
//! TOML profiles layered with `LOBBY_` environment overrides, plus the
//! translation to `lobby_core::LoginConfig`. The CLI adds flag overrides on
//! top of [`profile_to_login_config`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use lobby_core::{DEFAULT_ENDPOINT, LoginConfig, TlsVerification};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "LOBBY_CONFIG";

const ENV_PREFIX: &str = "LOBBY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Pick the active profile.
    ///
    /// An explicitly requested profile must exist. The configured
    /// `default_profile` is optional: if it names nothing, the global
    /// defaults apply on their own.
    pub fn active_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<Option<(&'a str, &'a Profile)>, ConfigError> {
        if let Some(name) = requested {
            return self
                .profiles
                .get(name)
                .map(|p| Some((name, p)))
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
        }

        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name).map(|p| (name, p))))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Endpoint used when no profile names one.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub color: ColorMode,

    #[serde(default)]
    pub insecure: bool,

    /// HTTP request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whole-attempt timeout, seconds.
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            output: OutputFormat::default(),
            color: ColorMode::default(),
            insecure: false,
            timeout: default_timeout(),
            attempt_timeout: default_attempt_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_attempt_timeout() -> u64 {
    10
}

/// Output format used when `--output` is not given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Color preference used when `--color` is not given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// A named server profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// XML-RPC endpoint (e.g., "http://game.example.com:8080/RPC2").
    pub endpoint: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    pub attempt_timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path.
///
/// `LOBBY_CONFIG` wins; otherwise XDG / platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("com", "lobby", "lobby").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lobby");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file. A missing file is not an error.
///
/// Environment keys nest on `__`: `LOBBY_DEFAULTS__TIMEOUT=5` sets
/// `defaults.timeout`, `LOBBY_DEFAULT_PROFILE=lan` sets `default_profile`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `LoginConfig` from a profile layered over the defaults. No CLI
/// flag overrides.
pub fn profile_to_login_config(
    profile: Option<&Profile>,
    defaults: &Defaults,
) -> Result<LoginConfig, ConfigError> {
    let raw = profile
        .and_then(|p| p.endpoint.as_deref())
        .unwrap_or(&defaults.endpoint);
    let endpoint = parse_endpoint(raw)?;

    let insecure = profile
        .and_then(|p| p.insecure)
        .unwrap_or(defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.as_ref()) {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = profile.and_then(|p| p.timeout).unwrap_or(defaults.timeout);
    let attempt_timeout = profile
        .and_then(|p| p.attempt_timeout)
        .unwrap_or(defaults.attempt_timeout);

    Ok(LoginConfig {
        endpoint,
        tls,
        timeout: nonzero_secs("timeout", timeout)?,
        attempt_timeout: nonzero_secs("attempt_timeout", attempt_timeout)?,
    })
}

/// Parse and check an endpoint URL.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

fn nonzero_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}
