//! `lobby login <NAME>`: one attempt, reported through the exit code.
//!
//! A connection error that came from a timeout exits with its own code.

use tracing::info;

use lobby_core::ConnectionStatus;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::commands::Frontend;
use crate::error::CliError;

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut frontend = Frontend::build(global, false)?;
    let status = frontend.attempt(&args.name).await?;
    frontend.report(status, &args.name)?;

    match status {
        ConnectionStatus::Success => {
            info!(username = ?frontend.session().username(), "logged in");
            Ok(())
        }
        ConnectionStatus::InvalidName => Err(CliError::InvalidName { name: args.name }),
        ConnectionStatus::NotConnected => {
            let url = frontend.endpoint().to_string();
            Err(match frontend.last_timeout() {
                Some(after) => CliError::Timeout { url, after },
                None => CliError::ConnectionFailed { url },
            })
        }
    }
}
