//! CLI configuration: thin wrapper around `lobby_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--endpoint,
//! --timeout, etc.) on top of the profile.

use std::path::PathBuf;
use std::time::Duration;

use lobby_core::{LoginConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lobby_config::{Config, Profile};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `LOBBY_CONFIG`, else the platform
/// default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(lobby_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(lobby_config::load_config_from(&config_file(global))?)
}

pub fn save(global: &GlobalOpts, cfg: &Config) -> Result<PathBuf, CliError> {
    let path = config_file(global);
    lobby_config::save_config_to(&path, cfg)?;
    Ok(path)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> Option<String> {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
}

/// Translate the active profile + global flags into a `LoginConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_login_config(global: &GlobalOpts, cfg: &Config) -> Result<LoginConfig, CliError> {
    let profile = cfg
        .active_profile(global.profile.as_deref())
        .map_err(|_| CliError::ProfileNotFound {
            name: global.profile.clone().unwrap_or_default(),
            available: available_profiles(cfg),
        })?
        .map(|(_, p)| p);

    // A --endpoint flag replaces whatever the profile says, even if the
    // profile's own value is unusable.
    let mut login = match &global.endpoint {
        Some(raw) => {
            let overridden = profile.cloned().map(|p| Profile {
                endpoint: None,
                ..p
            });
            let mut login = lobby_config::profile_to_login_config(overridden.as_ref(), &cfg.defaults)?;
            login.endpoint = lobby_config::parse_endpoint(raw)?;
            login
        }
        None => lobby_config::profile_to_login_config(profile, &cfg.defaults)?,
    };

    if global.insecure {
        login.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        login.timeout = flag_secs("timeout", secs)?;
    }
    if let Some(secs) = global.attempt_timeout {
        login.attempt_timeout = flag_secs("attempt-timeout", secs)?;
    }

    Ok(login)
}

/// Output format: flag > `[defaults].output` > text.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| cfg.defaults.output.into())
}

/// Color mode: flag > `[defaults].color` > auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| cfg.defaults.color.into())
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

fn flag_secs(field: &str, secs: u64) -> Result<Duration, CliError> {
    if secs == 0 {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}
