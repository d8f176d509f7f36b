//! Output formatting: human text or a single JSON object.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;

use lobby_core::ConnectionStatus;

use crate::cli::ColorMode;
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Machine-readable result of one login attempt.
#[derive(Debug, Serialize)]
pub struct LoginReport<'a> {
    pub status: &'static str,
    pub code: i32,
    pub description: &'static str,
    pub name: &'a str,
    /// Normalized session username, present only on success.
    pub username: Option<String>,
    pub endpoint: &'a str,
}

impl<'a> LoginReport<'a> {
    pub fn new(
        status: ConnectionStatus,
        name: &'a str,
        username: Option<String>,
        endpoint: &'a str,
    ) -> Self {
        Self {
            status: status.into(),
            code: status.code(),
            description: status.description(),
            name,
            username,
            endpoint,
        }
    }
}

/// Pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
