//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help
//! text. The two login rejections carry the alert text shown to the player.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use lobby_config::ConfigError;
use lobby_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_NAME: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Login outcomes ───────────────────────────────────────────────
    #[error("Invalid Name: {name:?}")]
    #[diagnostic(
        code(lobby::invalid_name),
        help("You have entered an invalid name, please try again.")
    )]
    InvalidName { name: String },

    #[error("Could not connect to server! Try again...")]
    #[diagnostic(
        code(lobby::connection_failed),
        help(
            "Check that the game platform server is running and reachable.\n\
             Endpoint: {url}"
        )
    )]
    ConnectionFailed { url: String },

    #[error("A connection attempt is already in progress")]
    #[diagnostic(code(lobby::busy))]
    AttemptInProgress,

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Could not set up a connection to {url}: {reason}")]
    #[diagnostic(
        code(lobby::setup_failed),
        help("Check the endpoint URL and TLS settings (--insecure, ca_cert).")
    )]
    Setup { url: String, reason: String },

    #[error("Could not connect to server! No reply within {after:?}")]
    #[diagnostic(
        code(lobby::timeout),
        help(
            "Increase the limit with --timeout or --attempt-timeout.\n\
             Endpoint: {url}"
        )
    )]
    Timeout { url: String, after: Duration },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lobby::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lobby::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lobby config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(lobby::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(
        code(lobby::prompt),
        help("Interactive commands need a terminal. Use `lobby login <NAME>` in scripts.")
    )]
    Prompt(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(lobby::internal))]
    Internal(String),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(lobby::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidName { .. } => exit_code::INVALID_NAME,
            Self::ConnectionFailed { .. } | Self::Setup { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(run `lobby config profiles`)".into(),
            },
            other => Self::Config(other),
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::Setup { url, reason },
            CoreError::Timeout { timeout } => Self::Timeout {
                url: String::new(),
                after: timeout,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Api { message, code } => Self::Internal(match code {
                Some(code) => format!("server fault {code}: {message}"),
                None => message,
            }),
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
