//! Login logic between `lobby-api` and the UI shell.
//!
//! - **[`ConnectFlow`]**: guards against overlapping attempts, runs the
//!   remote `connect` call on a worker task, maps the reply to a
//!   [`ConnectionStatus`], and posts exactly one outcome callback back to
//!   the UI thread.
//!
//! - **[`UiQueue`] / [`UiHandle`]**: the marshaling channel. Workers post,
//!   the thread that owns UI state drains.
//!
//! - **[`LoginSession`]**: shared handle to the logged-in username, written
//!   by the success callback and read by downstream screens.
//!
//! - **[`LoginConfig`]**: endpoint, TLS, and timeouts. Built by the shell;
//!   this crate never reads config files.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod flow;
pub mod session;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_ENDPOINT, LoginConfig, TlsVerification};
pub use dispatch::{UiHandle, UiQueue, ui_channel};
pub use error::{ConnectFailure, CoreError};
pub use flow::{ConnectFlow, FlowPhase, FlowState, LoginCallbacks};
pub use session::LoginSession;
pub use status::{ConnectionStatus, InvalidStatusValue};

pub use lobby_api::{RpcTransport, XmlRpcClient};
