//! flatdim - flatten layered image documents and mute their dark ink.

mod cli;
mod config;
mod image;
mod logger;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ToolConfig;

use crate::image::ProcessError;

/// Exit code for configuration and other non-pipeline failures.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = match ToolConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            // No config, so no configured log path: fall back to the default one.
            let _log = logger::open_log_file(&ToolConfig::fallback_log_path(&cli)).ok();
            logger::log_error_chain(&err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    // Held until the end of main so the log is closed on every path.
    let _log = match logger::open_log_file(&config.log_path()) {
        Ok(guard) => {
            debug!("log"; "writing to {}", guard.path().display());
            Some(guard)
        }
        Err(err) => {
            log!("warning"; "cannot open log file {}: {}", config.log_path().display(), err);
            None
        }
    };

    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log_error_chain(&err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli, config: &ToolConfig) -> Result<()> {
    match &cli.command {
        Commands::Convert { .. } => cli::convert::run(config).map(|_| ()),
        Commands::Inspect { .. } => cli::inspect::run(config),
    }
}

/// Map a failure to its exit code: pipeline stages get their own codes.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProcessError>())
        .map_or(EXIT_FAILURE, ProcessError::exit_code)
}
