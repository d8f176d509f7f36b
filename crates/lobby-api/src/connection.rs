// connection_handler endpoints
//
// The game platform exposes its login check as `connection_handler.connect`,
// taking the player name and answering with a status code. Interpreting the
// code is left to the caller; this layer only guarantees it is an integer.

use std::future::Future;

use tracing::debug;

use crate::client::XmlRpcClient;
use crate::error::Error;
use crate::xmlrpc::Value;

/// Remote method invoked by [`RpcTransport::connect`].
pub const CONNECT_METHOD: &str = "connection_handler.connect";

/// A channel able to run the platform's connect call.
///
/// Implemented by [`XmlRpcClient`]; tests substitute scripted transports.
/// The returned future must be `Send` so the call can run on a worker task.
pub trait RpcTransport: Send + Sync + 'static {
    /// Ask the server to admit `name`. No client-side validation is done:
    /// empty or odd names are passed through for the server to judge.
    fn connect(&self, name: &str) -> impl Future<Output = Result<i32, Error>> + Send;
}

impl RpcTransport for XmlRpcClient {
    async fn connect(&self, name: &str) -> Result<i32, Error> {
        let value = self.call(CONNECT_METHOD, &[Value::from(name)]).await?;
        debug!(result = ?value, "connect returned");
        value.as_i32().ok_or_else(|| Error::UnexpectedValue {
            method: CONNECT_METHOD,
            expected: "int",
            got: value.type_name().to_owned(),
        })
    }
}

impl<T: RpcTransport> RpcTransport for std::sync::Arc<T> {
    fn connect(&self, name: &str) -> impl Future<Output = Result<i32, Error>> + Send {
        (**self).connect(name)
    }
}
