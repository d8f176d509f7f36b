// ── Runtime login configuration ──
//
// Describes *where* and *how patiently* to connect. Built by the shell
// from config files and flags; the core never reads files itself.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use lobby_api::{TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Built-in root store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed servers).
    DangerAcceptInvalid,
}

/// Configuration for logging in against a single game server.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    /// XML-RPC endpoint (e.g., `http://localhost:8080/RPC2`).
    pub endpoint: Url,
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Upper bound on a whole connect attempt. Guarantees the in-progress
    /// flag is released even if the server never answers.
    pub attempt_timeout: Duration,
}

impl LoginConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }

    /// Reject configurations the transport can't use.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CoreError::Config {
                    message: format!("endpoint must be http or https, got '{other}'"),
                });
            }
        }
        if self.timeout.is_zero() || self.attempt_timeout.is_zero() {
            return Err(CoreError::Config {
                message: "timeouts must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn transport_config(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Default endpoint of a locally running platform server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/RPC2";

#[allow(clippy::expect_used)]
fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}
