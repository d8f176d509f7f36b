//! `lobby shell`: prompt for a name until the server accepts one.
//!
//! The prompt blocks this thread, which is also the thread that drains the
//! UI queue, so nothing else renders while the player types.

use std::io;

use dialoguer::Input;
use tracing::{debug, info};

use lobby_core::ConnectionStatus;

use crate::cli::GlobalOpts;
use crate::commands::Frontend;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let mut frontend = Frontend::build(global, true)?;
    if !global.quiet {
        eprintln!(
            "Connecting to {}. Leave the name empty to quit.",
            frontend.endpoint()
        );
    }

    while let Some(name) = prompt_name()? {
        let status = frontend.attempt(&name).await?;
        frontend.report(status, &name)?;

        match status {
            ConnectionStatus::Success => {
                info!(username = ?frontend.session().username(), "logged in");
                return Ok(());
            }
            ConnectionStatus::InvalidName | ConnectionStatus::NotConnected => {
                debug!(%status, "attempt rejected; prompting again");
            }
        }
    }

    debug!("prompt closed without login");
    Ok(())
}

/// `None` on empty input or end of input.
fn prompt_name() -> Result<Option<String>, CliError> {
    let input = Input::<String>::new()
        .with_prompt("Name")
        .allow_empty(true)
        .interact_text();
    read_name(input)
}

fn read_name(input: Result<String, dialoguer::Error>) -> Result<Option<String>, CliError> {
    match input {
        Ok(name) if name.trim().is_empty() => Ok(None),
        Ok(name) => Ok(Some(name)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}
