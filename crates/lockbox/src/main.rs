// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - in-process secret store demonstration.
//!
//! This is the binary entry point. It exercises the `lockbox-vault` library
//! surface and is not part of the store's contract.

mod demo;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lockbox_config::LockboxConfig;

/// Lockbox - keep secrets encrypted in process memory.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a demo secret, read it back through a scoped operation, idle, then wipe.
    Demo {
        /// Identifier to store the secret under (overrides `demo.secret_id`).
        #[arg(long)]
        id: Option<String>,
        /// Seconds to idle before teardown (overrides `demo.idle_secs`).
        #[arg(long)]
        idle_secs: Option<u64>,
    },
    /// Print the effective configuration.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lockbox_config::load_and_validate_path(path),
        None => lockbox_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.log_level);

    match cli.command {
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Demo { id, idle_secs }) => {
            if let Some(id) = id {
                config.demo.secret_id = id;
            }
            if let Some(idle_secs) = idle_secs {
                config.demo.idle_secs = idle_secs;
            }
            run(&config)
        }
        None => run(&config),
    }
}

fn run(config: &LockboxConfig) -> ExitCode {
    match demo::run_demo(config) {
        Ok(report) => {
            println!("secret length: {}", report.secret_len);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            eprintln!("lockbox: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &LockboxConfig) -> ExitCode {
    match toml::to_string_pretty(config) {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("lockbox: failed to render configuration: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lockbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
