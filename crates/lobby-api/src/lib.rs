//! Async client for the game-platform XML-RPC endpoint.
//!
//! - **[`XmlRpcClient`]**: HTTP transport: encodes `methodCall` documents,
//!   posts them with `reqwest`, and decodes the `methodResponse`.
//! - **[`RpcTransport`]**: the seam `lobby-core` depends on. One operation,
//!   [`connect`](RpcTransport::connect), backed by `connection_handler.connect`.
//! - **[`xmlrpc`]**: the wire codec, usable on its own.

pub mod client;
pub mod connection;
pub mod error;
pub mod transport;
pub mod xmlrpc;

pub use client::XmlRpcClient;
pub use connection::{CONNECT_METHOD, RpcTransport};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use xmlrpc::Value;
