// XML-RPC HTTP client
//
// Wraps `reqwest::Client` with XML-RPC request encoding and response
// decoding. Named handler calls (connection_handler.*) live in
// `connection.rs`; this module only knows about transport mechanics.

use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::xmlrpc::{self, Value};

/// Raw client for a game-platform XML-RPC endpoint.
#[derive(Debug, Clone)]
pub struct XmlRpcClient {
    http: reqwest::Client,
    endpoint: Url,
    /// Known only when the client was built from a [`TransportConfig`].
    timeout: Option<Duration>,
}

impl XmlRpcClient {
    /// Create a client for `endpoint` using the given transport settings.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`. Its timeouts
    /// surface as [`Error::Transport`].
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            timeout: None,
        }
    }

    /// The RPC endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke `method` with positional `params` and return the decoded result.
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, Error> {
        let body = xmlrpc::encode_call(method, params);
        debug!(endpoint = %self.endpoint, method, "POST xml-rpc call");
        trace!(%body, "request body");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(body = %text, "response body");
        xmlrpc::decode_response(&text)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout { timeout },
            _ => Error::Transport(err),
        }
    }
}
