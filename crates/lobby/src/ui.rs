//! Terminal rendering of the login flow.
//!
//! [`TerminalUi`] is the `LoginCallbacks` implementation driven by the UI
//! queue on the main thread. It owns the status line, the alert boxes, and
//! the hand-off to the platform view once a name is accepted.

use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::debug;

use lobby_core::{ConnectionStatus, LoginCallbacks, LoginSession};

pub const ATTEMPTING: &str = "Attempting to connect";

/// `Status: <text>...` while something is under way, `Status: <text>.` once
/// it has settled.
pub fn status_line(text: &str, active: bool) -> String {
    format!("Status: {text}{}", if active { "..." } else { "." })
}

/// What the terminal front-end is allowed to draw.
#[derive(Debug, Clone, Copy)]
pub struct UiStyle {
    /// Status lines and the platform view on stdout.
    pub show_status: bool,
    /// Alert boxes on stderr. Off for one-shot logins, where the error
    /// report carries the same text.
    pub alerts: bool,
    pub color: bool,
}

pub struct TerminalUi {
    session: LoginSession,
    style: UiStyle,
    spinner: Mutex<Option<ProgressBar>>,
    outcome: Mutex<Option<ConnectionStatus>>,
}

impl TerminalUi {
    pub fn new(session: LoginSession, style: UiStyle) -> Self {
        Self {
            session,
            style,
            spinner: Mutex::new(None),
            outcome: Mutex::new(None),
        }
    }

    /// Outcome delivered by the last callback, if not yet collected.
    pub fn take_outcome(&self) -> Option<ConnectionStatus> {
        lock(&self.outcome).take()
    }

    fn settle(&self, status: ConnectionStatus) {
        *lock(&self.outcome) = Some(status);
        if let Some(spinner) = lock(&self.spinner).take() {
            spinner.finish_and_clear();
        }
        self.set_status(status.description(), false);
    }

    fn set_status(&self, text: &str, active: bool) {
        if !self.style.show_status {
            return;
        }
        let line = status_line(text, active);

        if active && io::stdout().is_terminal() {
            let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(line);
            spinner.enable_steady_tick(Duration::from_millis(100));
            *lock(&self.spinner) = Some(spinner);
            return;
        }

        println!("{line}");
    }

    fn alert(&self, title: &str, header: Option<&str>, content: &str) {
        if !self.style.alerts {
            return;
        }
        let mut stderr = io::stderr().lock();
        let heading = match header {
            Some(header) => format!("{title}: {header}"),
            None => title.to_owned(),
        };
        if self.style.color {
            let _ = writeln!(stderr, "{} {}", "✗".red(), heading.red().bold());
        } else {
            let _ = writeln!(stderr, "✗ {heading}");
        }
        let _ = writeln!(stderr, "  {content}");
    }

    /// The post-login view.
    fn show_platform(&self, name: &str) {
        if !self.style.show_status {
            return;
        }
        let username = self.session.username().unwrap_or_default();
        println!();
        if self.style.color {
            println!("Welcome to the game platform, {}!", name.green().bold());
        } else {
            println!("Welcome to the game platform, {name}!");
        }
        println!("Logged in as {username}");
    }
}

impl LoginCallbacks for TerminalUi {
    fn on_connection_attempt_started(&self) {
        *lock(&self.outcome) = None;
        self.set_status(ATTEMPTING, true);
    }

    fn on_success(&self, username: &str) {
        self.session.set_username(username);
        self.settle(ConnectionStatus::Success);
        debug!(username, "switching to platform view");
        self.show_platform(username);
    }

    fn on_invalid_name(&self) {
        self.settle(ConnectionStatus::InvalidName);
        self.alert(
            "Connection error",
            Some("Invalid Name"),
            "You have entered an invalid name, please try again.",
        );
    }

    fn on_connection_error(&self) {
        self.settle(ConnectionStatus::NotConnected);
        self.alert(
            "Connection Error",
            None,
            "Could not connect to server! Try again...",
        );
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
