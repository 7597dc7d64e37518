use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "swat-export",
    version,
    about = "Export Outscan users and SWAT permissions to CSV"
)]
pub struct Cli {
    /// Output format for status messages
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "OUTSCAN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// XMLAPI endpoint (overrides config file)
    #[arg(long, env = "OUTSCAN_URL")]
    pub url: Option<String>,

    /// Application token (overrides config file)
    #[arg(long, env = "OUTSCAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// CSV destination, `-` for stdout (default: SWAT.csv)
    #[arg(long, short = 'O', env = "OUTSCAN_OUTPUT", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "OUTSCAN_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Treat an empty user list as an error instead of writing a header-only file
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}
