mod cli;
mod color;
mod config;
mod export;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{CliOverrides, Config};
use log::LevelFilter;
use outscan_backend::OutscanClient;
use output::{output_error, ExportSummary, Reporter};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_logging(cli.verbose);

    let format = cli.format;
    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(output::classify(&e).1);
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var_os("RUST_LOG").is_none() {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        builder.filter_level(level);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(CliOverrides {
        url: cli.url,
        token: cli.token,
        output: cli.output,
        timeout_secs: cli.timeout,
    });
    config.validate()?;

    let reporter = Reporter::new(cli.format, export::is_dash(&config.output));
    let client = OutscanClient::with_timeout(config.url(), config.token(), config.timeout());

    reporter.progress(&format!("Retrieving users from {}", client.base_url()));
    let users = client.get_users()?;
    reporter.progress("Success...");

    if users.is_empty() {
        if cli.fail_on_empty {
            return Err(export::EmptyExport.into());
        }
        log::warn!("Outscan returned no users; writing header-only export");
    }

    let rows = export::export_to_path(&users, &config.output)?;

    reporter.summary(&ExportSummary {
        success: true,
        rows,
        path: config.output.display().to_string(),
    });
    Ok(())
}
