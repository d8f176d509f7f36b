use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `lobby-api` crate.
///
/// Covers every way a remote call can fail: the server answering with an
/// XML-RPC fault, a reply that doesn't follow the protocol, and the HTTP
/// channel itself. `lobby-core` classifies these into protocol vs. transport
/// failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Remote execution ────────────────────────────────────────────
    /// The server executed the call and answered with an XML-RPC fault.
    #[error("Remote fault {code}: {message}")]
    Fault { code: i32, message: String },

    /// Non-success HTTP status from the RPC endpoint.
    #[error("RPC endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request ran past the client's configured timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not a well-formed `methodResponse`.
    #[error("Malformed XML-RPC response: {message}")]
    Decode { message: String, body: String },

    /// Well-formed response, but the value has the wrong type.
    #[error("Unexpected {method} result: expected {expected}, got {got}")]
    UnexpectedValue {
        method: &'static str,
        expected: &'static str,
        got: String,
    },
}

impl Error {
    /// Returns `true` if the failure happened on the channel rather than
    /// in the remote call itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout { .. } | Self::Tls(_)
        )
    }

    /// Returns `true` if the server was reached but rejected or could not
    /// execute the call.
    pub fn is_protocol(&self) -> bool {
        !self.is_transport()
    }

    /// Returns `true` for a request that ran out of time, whichever layer
    /// noticed.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// The XML-RPC fault code, if the server sent one.
    pub fn fault_code(&self) -> Option<i32> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}
