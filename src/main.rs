#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! cloudctl — sandbox (serverless functions) commands backed by an external engine.

mod cli;
mod commands;
mod config;
mod sandbox;
mod types;

use clap::Parser;

use cli::{Cli, OutputCtx, write_error};
use config::{CliOverrides, Config};
use types::ErrorOutput;

/// Exit code for configuration and startup failures.
const EXIT_CONFIG: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::new()
        .parse_env(env_logger::Env::default().default_filter_or(filter))
        .format_target(false)
        .format_timestamp(None)
        .init();

    let overrides = CliOverrides {
        sandbox_dir: cli.sandbox_dir.clone(),
    };
    let config = match Config::load(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(err) => {
            write_error(&ErrorOutput::from_startup_error(&err), cli.output, cli.json);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header, cli.debug);

    if let Err(err) = commands::dispatch(&cli.command, &ctx, &config) {
        log::debug!("command failed: {err:?}");
        write_error(&ErrorOutput::from_sandbox_error(&err), cli.output, cli.json);
        std::process::exit(err.exit_code());
    }
}
