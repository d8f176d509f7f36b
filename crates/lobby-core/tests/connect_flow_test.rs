#![allow(clippy::unwrap_used)]
// Integration tests for `ConnectFlow` with scripted transports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tokio::sync::Notify;
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lobby_api::{Error, RpcTransport, XmlRpcClient};
use lobby_core::{
    ConnectFailure, ConnectFlow, ConnectionStatus, FlowPhase, LoginCallbacks, LoginConfig,
    LoginSession, UiQueue, ui_channel,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Started,
    Success(String),
    InvalidName,
    ConnectionError,
}

/// Callbacks that record every notification and, like a real shell,
/// store the username on success.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Outcome>>,
    session: LoginSession,
    threads: Mutex<Vec<ThreadId>>,
}

impl Recorder {
    fn events(&self) -> Vec<Outcome> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, outcome: Outcome) {
        self.events.lock().unwrap().push(outcome);
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl LoginCallbacks for Recorder {
    fn on_connection_attempt_started(&self) {
        self.push(Outcome::Started);
    }

    fn on_success(&self, username: &str) {
        self.session.set_username(username);
        self.push(Outcome::Success(username.to_owned()));
    }

    fn on_invalid_name(&self) {
        self.push(Outcome::InvalidName);
    }

    fn on_connection_error(&self) {
        self.push(Outcome::ConnectionError);
    }
}

/// Transport answering every call from a closure.
struct Scripted<F> {
    reply: F,
    calls: AtomicUsize,
}

fn scripted<F>(reply: F) -> Arc<Scripted<F>>
where
    F: Fn() -> Result<i32, Error> + Send + Sync + 'static,
{
    Arc::new(Scripted {
        reply,
        calls: AtomicUsize::new(0),
    })
}

impl<F> RpcTransport for Scripted<F>
where
    F: Fn() -> Result<i32, Error> + Send + Sync + 'static,
{
    async fn connect(&self, _name: &str) -> Result<i32, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

/// Transport that blocks each call until the test releases it.
struct Gated {
    code: i32,
    calls: AtomicUsize,
    release: Notify,
    worker_thread: Mutex<Option<ThreadId>>,
}

impl Gated {
    fn new(code: i32) -> Arc<Self> {
        Arc::new(Self {
            code,
            calls: AtomicUsize::new(0),
            release: Notify::new(),
            worker_thread: Mutex::new(None),
        })
    }
}

impl RpcTransport for Gated {
    async fn connect(&self, _name: &str) -> Result<i32, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.worker_thread.lock().unwrap() = Some(thread::current().id());
        self.release.notified().await;
        Ok(self.code)
    }
}

/// Transport that panics mid-call.
struct Panicking;

impl RpcTransport for Panicking {
    async fn connect(&self, name: &str) -> Result<i32, Error> {
        tokio::task::yield_now().await;
        panic!("transport blew up while connecting {name}");
    }
}

/// Transport whose call never completes.
struct Hanging;

impl RpcTransport for Hanging {
    async fn connect(&self, _name: &str) -> Result<i32, Error> {
        std::future::pending().await
    }
}

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

async fn deliver_one(queue: &mut UiQueue) {
    let delivered = tokio::time::timeout(Duration::from_secs(10), queue.run_next())
        .await
        .expect("outcome posted before deadline");
    assert!(delivered, "UI queue closed unexpectedly");
}

async fn wait_for_calls(calls: &AtomicUsize, n: usize) {
    while calls.load(Ordering::SeqCst) < n {
        tokio::task::yield_now().await;
    }
}

async fn wait_until_idle<T: RpcTransport>(flow: &ConnectFlow<T>) {
    while flow.is_in_progress() {
        tokio::task::yield_now().await;
    }
}

/// Run a single attempt against a transport returning `reply`.
async fn attempt_once<F>(name: &str, reply: F) -> (Arc<Recorder>, ConnectionStatus)
where
    F: Fn() -> Result<i32, Error> + Send + Sync + 'static,
{
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(scripted(reply), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect(name, recorder.clone()));
    deliver_one(&mut queue).await;
    assert_eq!(queue.run_pending(), 0, "only one outcome per attempt");
    (recorder, flow.last_status())
}

// ── Status mapping ──────────────────────────────────────────────────

#[tokio::test]
async fn test_each_known_code_fires_its_callback() {
    let cases = [
        (0, Outcome::ConnectionError, ConnectionStatus::NotConnected),
        (1, Outcome::Success("player".into()), ConnectionStatus::Success),
        (2, Outcome::InvalidName, ConnectionStatus::InvalidName),
    ];

    for (code, expected, status) in cases {
        let (recorder, last) = attempt_once("player", move || Ok(code)).await;
        assert_eq!(recorder.events(), vec![Outcome::Started, expected], "code {code}");
        assert_eq!(last, status);
    }
}

#[tokio::test]
async fn test_out_of_range_codes_are_connection_errors() {
    for code in [3, -1, 99, i32::MAX] {
        let (recorder, last) = attempt_once("player", move || Ok(code)).await;
        assert_eq!(
            recorder.events(),
            vec![Outcome::Started, Outcome::ConnectionError],
            "code {code}"
        );
        assert_eq!(last, ConnectionStatus::NotConnected);
        assert_eq!(recorder.session.username(), None);
    }
}

#[tokio::test]
async fn test_remote_fault_is_connection_error() {
    let (recorder, _) = attempt_once("player", || {
        Err(Error::Fault {
            code: 0,
            message: "server exploded".into(),
        })
    })
    .await;
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::ConnectionError]
    );
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_valid_user_logs_in_lower_cased() {
    let (recorder, last) = attempt_once("validUser", || Ok(1)).await;
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::Success("validUser".into())]
    );
    assert_eq!(last, ConnectionStatus::Success);
    assert_eq!(recorder.session.username().as_deref(), Some("validuser"));
}

#[tokio::test]
async fn test_empty_name_rejected_leaves_session_unchanged() {
    let (recorder, last) = attempt_once("", || Ok(2)).await;
    assert_eq!(recorder.events(), vec![Outcome::Started, Outcome::InvalidName]);
    assert_eq!(last, ConnectionStatus::InvalidName);
    assert!(!recorder.session.is_logged_in());
}

#[tokio::test]
async fn test_transport_failure_resets_flag_for_retry() {
    let failing = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failing);
    let transport = scripted(move || {
        // First call fails on the channel, second succeeds.
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(Error::Timeout {
                timeout: Duration::from_secs(30),
            })
        } else {
            Ok(1)
        }
    });

    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Arc::clone(&transport), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;
    assert!(!flow.is_in_progress());
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::ConnectionError]
    );
    assert_eq!(flow.last_timeout(), Some(Duration::from_secs(30)));

    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(flow.last_timeout(), None);
    assert_eq!(
        recorder.events()[2..],
        [Outcome::Started, Outcome::Success("alice".into())]
    );
}

// ── Concurrency guard ───────────────────────────────────────────────

#[tokio::test]
async fn test_second_attempt_while_outstanding_is_dropped() {
    let gate = Gated::new(1);
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Arc::clone(&gate), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("first", recorder.clone()));
    assert!(flow.is_in_progress());
    assert!(!flow.attempt_connect("second", recorder.clone()));
    // Clones share the guard.
    assert!(!flow.clone().attempt_connect("third", recorder.clone()));

    wait_for_calls(&gate.calls, 1).await;
    gate.release.notify_one();
    deliver_one(&mut queue).await;

    assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::Success("first".into())]
    );
    assert_eq!(queue.run_pending(), 0);

    // Once idle, a new attempt goes through and makes a new call.
    assert!(!flow.is_in_progress());
    assert!(flow.attempt_connect("again", recorder.clone()));
    wait_for_calls(&gate.calls, 2).await;
    gate.release.notify_one();
    deliver_one(&mut queue).await;
    assert_eq!(gate.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_hung_call_times_out_and_releases_flag() {
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Hanging, ui, Duration::from_millis(50));
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;

    assert!(!flow.is_in_progress());
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::ConnectionError]
    );
    assert_eq!(flow.last_timeout(), Some(Duration::from_millis(50)));
    assert!(flow.attempt_connect("alice", recorder.clone()));
}

#[tokio::test]
async fn test_panicking_transport_still_delivers_connection_error() {
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Panicking, ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;

    assert!(!flow.is_in_progress());
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::ConnectionError]
    );
    assert_eq!(flow.last_status(), ConnectionStatus::NotConnected);
    assert_eq!(queue.run_pending(), 0);

    // The flow is still usable afterwards.
    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;
    assert_eq!(recorder.events().len(), 4);
}

#[test]
fn test_attempt_outside_runtime_is_refused_without_locking_flow() {
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(scripted(|| Ok(1)), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(!flow.attempt_connect("alice", recorder.clone()));
    assert!(!flow.is_in_progress());
    assert_eq!(flow.state().borrow().phase, FlowPhase::Idle);
    assert!(recorder.events().is_empty(), "no attempt should have started");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        assert!(flow.attempt_connect("alice", recorder.clone()));
        deliver_one(&mut queue).await;
    });
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::Success("alice".into())]
    );
}

// ── UI marshaling ───────────────────────────────────────────────────

#[tokio::test]
async fn test_outcome_waits_for_ui_queue() {
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(scripted(|| Ok(1)), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    wait_until_idle(&flow).await;

    // The worker finished, but nothing ran on the UI side yet.
    assert_eq!(recorder.events(), vec![Outcome::Started]);
    assert_eq!(queue.run_pending(), 1);
    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::Success("alice".into())]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_call_runs_off_ui_thread_and_callback_on_it() {
    let ui_thread = thread::current().id();
    let gate = Gated::new(2);
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Arc::clone(&gate), ui, ATTEMPT_TIMEOUT);
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    gate.release.notify_one();
    deliver_one(&mut queue).await;

    let worker = gate.worker_thread.lock().unwrap().expect("transport was called");
    assert_ne!(worker, ui_thread);
    assert!(
        recorder.threads.lock().unwrap().iter().all(|t| *t == ui_thread),
        "callbacks must run on the UI thread"
    );
    assert_eq!(recorder.events(), vec![Outcome::Started, Outcome::InvalidName]);
}

#[tokio::test]
async fn test_state_watch_tracks_phase() {
    let gate = Gated::new(1);
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::new(Arc::clone(&gate), ui, ATTEMPT_TIMEOUT);
    let state = flow.state();
    assert_eq!(state.borrow().phase, FlowPhase::Idle);

    assert!(flow.attempt_connect("alice", Arc::new(Recorder::default())));
    assert_eq!(state.borrow().phase, FlowPhase::Attempting);

    gate.release.notify_one();
    deliver_one(&mut queue).await;
    let snapshot = *state.borrow();
    assert_eq!(snapshot.phase, FlowPhase::Idle);
    assert_eq!(snapshot.last_status, ConnectionStatus::Success);
}

// ── End to end over HTTP ────────────────────────────────────────────

#[tokio::test]
async fn test_from_config_against_xml_rpc_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<string>Alice</string>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<?xml version=\"1.0\"?><methodResponse><params><param>\
             <value><int>1</int></value></param></params></methodResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = LoginConfig::new(Url::parse(&format!("{}/RPC2", server.uri())).unwrap());
    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::from_config(&config, ui).unwrap();
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("Alice", recorder.clone()));
    deliver_one(&mut queue).await;

    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::Success("Alice".into())]
    );
    assert_eq!(recorder.session.username().as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_refused_port_is_transport_failure_and_connection_error() {
    // Reserve a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = LoginConfig::new(Url::parse(&format!("http://{addr}/RPC2")).unwrap());

    let client = XmlRpcClient::new(config.endpoint.clone(), &Default::default()).unwrap();
    let err = client.connect("alice").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(matches!(
        ConnectFailure::from(err),
        ConnectFailure::TransportIo(_)
    ));

    let (ui, mut queue) = ui_channel();
    let flow = ConnectFlow::from_config(&config, ui).unwrap();
    let recorder = Arc::new(Recorder::default());

    assert!(flow.attempt_connect("alice", recorder.clone()));
    deliver_one(&mut queue).await;

    assert_eq!(
        recorder.events(),
        vec![Outcome::Started, Outcome::ConnectionError]
    );
    assert_eq!(flow.last_status(), ConnectionStatus::NotConnected);
    assert_eq!(flow.last_timeout(), None);
    assert!(!flow.is_in_progress());
}

#[tokio::test]
async fn test_from_config_rejects_bad_scheme() {
    let config = LoginConfig::new(Url::parse("ftp://localhost/RPC2").unwrap());
    let (ui, _queue) = ui_channel();
    assert!(ConnectFlow::from_config(&config, ui).is_err());
}
