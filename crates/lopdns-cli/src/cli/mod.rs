//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use args::{Cli, LogLevel};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config, Settings};
use crate::error::CommandError;

/// Run the CLI application and return the process exit code.
pub async fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version end up here too
            let code = if e.use_stderr() {
                CommandError::INVALID_ARGUMENTS
            } else {
                0
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => return report(&CommandError::InvalidArguments(format!("{e:#}"))),
    };

    init_logging(config::log_level(&cli, &config));

    let result = match Settings::resolve(cli, config) {
        Ok(settings) => {
            debug!(
                action = %settings.action,
                base_url = %settings.base_url,
                zone = settings.zone.as_deref().unwrap_or("*"),
                dry_run = settings.dry_run,
                "resolved settings"
            );
            commands::execute(settings).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &CommandError) -> ExitCode {
    eprintln!("{} {}", "Error:".red().bold(), err);
    ExitCode::from(err.exit_code())
}

/// Log to stderr at `level`; `RUST_LOG` wins when set
fn init_logging(level: LogLevel) {
    let level = LevelFilter::from(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
