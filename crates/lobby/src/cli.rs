//! Clap derive structures for the `lobby` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lobby -- log in to a game platform server
#[derive(Debug, Parser)]
#[command(
    name = "lobby",
    version,
    about = "Log in to a game platform server from the terminal",
    long_about = "Connects to a game platform server over XML-RPC, checks the chosen\n\
        player name, and opens the platform view once the server accepts it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "LOBBY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// XML-RPC endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "LOBBY_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "LOBBY_CONFIG", global = true, hide_env = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "LOBBY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LOBBY_INSECURE", global = true)]
    pub insecure: bool,

    /// HTTP request timeout in seconds
    #[arg(long, env = "LOBBY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Give up on a connect attempt after this many seconds
    #[arg(long, env = "LOBBY_ATTEMPT_TIMEOUT", global = true)]
    pub attempt_timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status lines and alerts for humans (default)
    Text,
    /// One JSON object describing the outcome
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Make one login attempt with the given name
    Login(LoginArgs),

    /// Prompt for a name until the server accepts one
    Shell,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Player name to connect with
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Key: endpoint, ca_cert, insecure, timeout, attempt_timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

impl From<lobby_config::OutputFormat> for OutputFormat {
    fn from(format: lobby_config::OutputFormat) -> Self {
        match format {
            lobby_config::OutputFormat::Text => Self::Text,
            lobby_config::OutputFormat::Json => Self::Json,
        }
    }
}

impl From<lobby_config::ColorMode> for ColorMode {
    fn from(mode: lobby_config::ColorMode) -> Self {
        match mode {
            lobby_config::ColorMode::Auto => Self::Auto,
            lobby_config::ColorMode::Always => Self::Always,
            lobby_config::ColorMode::Never => Self::Never,
        }
    }
}
