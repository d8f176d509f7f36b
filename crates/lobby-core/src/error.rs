// ── Core error types ──
//
// `ConnectFailure` classifies why an attempt ended in NOT_CONNECTED; it is
// logged on the worker and never crosses to the UI thread. `CoreError` is
// for setup problems (bad endpoint, TLS) surfaced to the shell before any
// attempt is made.

use std::time::Duration;

use thiserror::Error;

use crate::status::InvalidStatusValue;

/// Why a connect attempt did not produce a server-reported status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectFailure {
    /// The server rejected or could not execute the call.
    #[error("remote call failed: {0}")]
    RemoteProtocol(String),

    /// Network or channel failure.
    #[error("transport failure: {0}")]
    TransportIo(String),

    /// No reply arrived in time, from either the HTTP or the attempt limit.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// The attempt task died before producing a result.
    #[error("connect attempt aborted: {0}")]
    Aborted(String),

    /// The server answered with a code outside the known status table.
    #[error("server returned unknown connection status {0}")]
    InvalidStatusValue(i32),
}

impl From<lobby_api::Error> for ConnectFailure {
    fn from(err: lobby_api::Error) -> Self {
        if let lobby_api::Error::Timeout { timeout } = err {
            Self::Timeout(timeout)
        } else if err.is_transport() {
            Self::TransportIo(err.to_string())
        } else {
            Self::RemoteProtocol(err.to_string())
        }
    }
}

impl From<InvalidStatusValue> for ConnectFailure {
    fn from(err: InvalidStatusValue) -> Self {
        Self::InvalidStatusValue(err.0)
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach game server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Remote call failed: {message}")]
    Api {
        message: String,
        /// XML-RPC fault code, if the server sent one.
        code: Option<i32>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lobby_api::Error> for CoreError {
    fn from(err: lobby_api::Error) -> Self {
        match err {
            lobby_api::Error::Fault { code, message } => CoreError::Api {
                message,
                code: Some(code),
            },
            lobby_api::Error::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                code: None,
            },
            lobby_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            lobby_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            lobby_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lobby_api::Error::Decode { message, body: _ } => {
                CoreError::Internal(format!("Malformed response: {message}"))
            }
            err @ lobby_api::Error::UnexpectedValue { .. } => {
                CoreError::Internal(err.to_string())
            }
        }
    }
}
