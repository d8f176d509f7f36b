// ── Connect flow ──
//
// Turns a UI-triggered login into one remote call on a worker task and
// delivers exactly one outcome callback back on the UI thread. At most one
// attempt is outstanding per flow; extra requests are dropped, not queued.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use lobby_api::{RpcTransport, XmlRpcClient};

use crate::config::LoginConfig;
use crate::dispatch::UiHandle;
use crate::error::{ConnectFailure, CoreError};
use crate::status::ConnectionStatus;

/// Callback surface implemented by the UI shell.
///
/// `on_connection_attempt_started` runs synchronously inside
/// [`ConnectFlow::attempt_connect`]; the outcome callbacks run when the UI
/// thread drains its [`UiQueue`](crate::dispatch::UiQueue). Exactly one
/// outcome callback fires per accepted attempt.
pub trait LoginCallbacks: Send + Sync {
    fn on_connection_attempt_started(&self) {}

    /// The server accepted `username` (as typed, not normalized). Storing it
    /// in the [`LoginSession`](crate::LoginSession) and switching views is the
    /// implementor's job.
    fn on_success(&self, username: &str);

    fn on_invalid_name(&self);

    fn on_connection_error(&self);
}

/// Where a flow is in its per-attempt state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    #[default]
    Idle,
    Attempting,
}

/// Observable flow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowState {
    pub phase: FlowPhase,
    /// Status computed by the most recent completed attempt.
    pub last_status: ConnectionStatus,
    /// The limit that ran out, if the most recent attempt ended on a timeout.
    pub last_timeout: Option<Duration>,
}

/// The login orchestrator.
///
/// Cheaply cloneable via `Arc<FlowInner>`; clones share the in-progress
/// guard, so the single-attempt rule holds across all of them.
pub struct ConnectFlow<T: RpcTransport> {
    inner: Arc<FlowInner<T>>,
}

struct FlowInner<T> {
    transport: T,
    ui: UiHandle,
    attempt_timeout: Duration,
    in_progress: AtomicBool,
    state: watch::Sender<FlowState>,
}

impl<T: RpcTransport> Clone for ConnectFlow<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: RpcTransport> fmt::Debug for ConnectFlow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectFlow")
            .field("attempt_timeout", &self.inner.attempt_timeout)
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ConnectFlow<XmlRpcClient> {
    /// Build a flow talking XML-RPC to the configured endpoint.
    pub fn from_config(config: &LoginConfig, ui: UiHandle) -> Result<Self, CoreError> {
        config.validate()?;
        let client = XmlRpcClient::new(config.endpoint.clone(), &config.transport_config())?;
        debug!(endpoint = %config.endpoint, "xml-rpc transport ready");
        Ok(Self::new(client, ui, config.attempt_timeout))
    }
}

impl<T: RpcTransport> ConnectFlow<T> {
    pub fn new(transport: T, ui: UiHandle, attempt_timeout: Duration) -> Self {
        let (state, _) = watch::channel(FlowState::default());
        Self {
            inner: Arc::new(FlowInner {
                transport,
                ui,
                attempt_timeout,
                in_progress: AtomicBool::new(false),
                state,
            }),
        }
    }

    /// Start a connect attempt for `name`.
    ///
    /// Returns `false` and does nothing if an attempt is already running or
    /// there is no Tokio runtime to run it on. Otherwise notifies
    /// `callbacks` that the attempt started, spawns the remote call, and
    /// returns `true`.
    pub fn attempt_connect(
        &self,
        name: impl Into<String>,
        callbacks: Arc<dyn LoginCallbacks>,
    ) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            warn!("connect attempt requested outside a Tokio runtime; ignoring");
            return false;
        };

        if self
            .inner
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("connect attempt already in progress; ignoring");
            return false;
        }

        let name = name.into();
        self.inner
            .state
            .send_modify(|s| s.phase = FlowPhase::Attempting);
        callbacks.on_connection_attempt_started();

        let inner = Arc::clone(&self.inner);
        runtime.clone().spawn(async move {
            let guard = AttemptGuard(&inner);

            // The call runs in its own task so a panicking transport still
            // ends in an outcome.
            let worker = Arc::clone(&inner);
            let call_name = name.clone();
            let result = runtime
                .spawn(async move { worker.call(&call_name).await })
                .await
                .unwrap_or_else(|join| Err(ConnectFailure::Aborted(join.to_string())));

            let (status, last_timeout) = settle(result);
            inner.state.send_modify(|s| {
                s.last_status = status;
                s.last_timeout = last_timeout;
            });
            drop(guard);

            let posted = inner
                .ui
                .post(move || deliver_outcome(status, &name, callbacks.as_ref()));
            if !posted {
                warn!(%status, "UI queue gone before outcome could be delivered");
            }
        });

        true
    }

    pub fn is_in_progress(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    pub fn last_status(&self) -> ConnectionStatus {
        self.inner.state.borrow().last_status
    }

    /// The limit that expired, if the last completed attempt timed out.
    pub fn last_timeout(&self) -> Option<Duration> {
        self.inner.state.borrow().last_timeout
    }

    /// Subscribe to phase and status changes.
    pub fn state(&self) -> watch::Receiver<FlowState> {
        self.inner.state.subscribe()
    }
}

impl<T: RpcTransport> FlowInner<T> {
    async fn call(&self, name: &str) -> Result<ConnectionStatus, ConnectFailure> {
        debug!(name, "dispatching connect call");
        let code = tokio::time::timeout(self.attempt_timeout, self.transport.connect(name))
            .await
            .map_err(|_| ConnectFailure::Timeout(self.attempt_timeout))??;
        Ok(ConnectionStatus::try_from(code)?)
    }
}

/// Collapse an attempt result into the status to report, plus the limit
/// that expired when the failure was a timeout.
fn settle(result: Result<ConnectionStatus, ConnectFailure>) -> (ConnectionStatus, Option<Duration>) {
    match result {
        Ok(status) => {
            info!(%status, "server answered connect");
            (status, None)
        }
        Err(failure) => {
            warn!(error = %failure, "connect attempt failed");
            let timeout = match failure {
                ConnectFailure::Timeout(limit) => Some(limit),
                _ => None,
            };
            (ConnectionStatus::NotConnected, timeout)
        }
    }
}

/// Releases the in-progress flag and returns the phase to idle when the
/// attempt finishes, including by panic.
struct AttemptGuard<'a, T>(&'a FlowInner<T>);

impl<T> Drop for AttemptGuard<'_, T> {
    fn drop(&mut self) {
        self.0.in_progress.store(false, Ordering::Release);
        self.0.state.send_modify(|s| s.phase = FlowPhase::Idle);
    }
}

fn deliver_outcome(status: ConnectionStatus, name: &str, callbacks: &dyn LoginCallbacks) {
    match status {
        ConnectionStatus::Success => callbacks.on_success(name),
        ConnectionStatus::InvalidName => callbacks.on_invalid_name(),
        ConnectionStatus::NotConnected => callbacks.on_connection_error(),
    }
}
