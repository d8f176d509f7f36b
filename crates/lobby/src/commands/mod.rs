//! Command handlers and the login front-end they share.

pub mod config_cmd;
pub mod login;
pub mod shell;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use lobby_core::{
    ConnectFlow, ConnectionStatus, LoginCallbacks, LoginSession, UiQueue, XmlRpcClient,
    ui_channel,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output::{self, LoginReport};
use crate::ui::{TerminalUi, UiStyle};

/// Everything a login command needs: the flow, the UI queue this thread
/// drains, and the terminal callbacks.
pub struct Frontend {
    flow: ConnectFlow<XmlRpcClient>,
    queue: UiQueue,
    ui: Arc<TerminalUi>,
    session: LoginSession,
    endpoint: Url,
    format: OutputFormat,
    quiet: bool,
}

impl Frontend {
    /// `interactive` turns on alert boxes; one-shot commands report
    /// rejections through their exit error instead.
    pub fn build(global: &GlobalOpts, interactive: bool) -> Result<Self, CliError> {
        let cfg = config::load(global)?;
        let login = config::resolve_login_config(global, &cfg)?;
        let format = config::output_format(global, &cfg);

        let session = LoginSession::new();
        let style = UiStyle {
            show_status: !global.quiet && format == OutputFormat::Text,
            alerts: interactive && format == OutputFormat::Text,
            color: output::should_color(config::color_mode(global, &cfg)),
        };
        let ui = Arc::new(TerminalUi::new(session.clone(), style));

        let (handle, queue) = ui_channel();
        let flow = ConnectFlow::from_config(&login, handle)?;
        debug!(
            endpoint = %login.endpoint,
            attempt_timeout_secs = login.attempt_timeout.as_secs(),
            "login front-end ready"
        );

        Ok(Self {
            flow,
            queue,
            ui,
            session,
            endpoint: login.endpoint,
            format,
            quiet: global.quiet,
        })
    }

    /// Start one attempt and run UI jobs on this thread until its outcome
    /// has been delivered.
    pub async fn attempt(&mut self, name: &str) -> Result<ConnectionStatus, CliError> {
        let callbacks: Arc<dyn LoginCallbacks> = self.ui.clone();
        if !self.flow.attempt_connect(name, callbacks) {
            return Err(CliError::AttemptInProgress);
        }

        loop {
            if !self.queue.run_next().await {
                return Err(CliError::Internal("UI queue closed mid-attempt".into()));
            }
            if let Some(status) = self.ui.take_outcome() {
                return Ok(status);
            }
        }
    }

    /// Print the JSON report for `status` when JSON output is selected.
    pub fn report(&self, status: ConnectionStatus, name: &str) -> Result<(), CliError> {
        if self.format != OutputFormat::Json {
            return Ok(());
        }
        let report = LoginReport::new(
            status,
            name,
            self.session.username(),
            self.endpoint.as_str(),
        );
        output::print_output(&output::render_json(&report)?, self.quiet);
        Ok(())
    }

    /// The limit that ran out, if the last attempt failed on a timeout.
    pub fn last_timeout(&self) -> Option<Duration> {
        self.flow.last_timeout()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn session(&self) -> &LoginSession {
        &self.session
    }
}
