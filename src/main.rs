// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::{info, warn, Level};

use fetch_actions_logs::cli::{normalize_args, Cli};
use fetch_actions_logs::error::{listing_failure, ErrorBuilder};
use fetch_actions_logs::fetch::{ensure_output_dir, fetch_logs};
use fetch_actions_logs::github::GitHubClient;

/// Exit codes following sysexits.h conventions
mod exit_codes {
    /// Success - operation completed (individual downloads may have failed)
    pub const SUCCESS: i32 = 0;
    /// General error - listing failed or the client could not be set up
    pub const ERROR: i32 = 1;
    /// Usage error - invalid command line arguments
    pub const USAGE: i32 = 64;
    /// Can't create output - the output directory could not be created
    pub const CANT_CREATE: i32 = 73;
}

use exit_codes::*;

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        Level::WARN
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display, code: i32) -> ! {
    eprintln!("{}", message.to_string().red());
    std::process::exit(code);
}

fn main() {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version end up here too
            let code = if e.use_stderr() { USAGE } else { SUCCESS };
            let _ = e.print();
            // clap only renders usage for missing or unexpected arguments
            if e.kind() == ErrorKind::ValueValidation {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            std::process::exit(code);
        }
    };

    init_logging(cli.quiet, cli.verbose);

    let config = match cli.into_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => fail(
            ErrorBuilder::new("Invalid configuration")
                .cause(format!("{:#}", e))
                .fix("Check --api-url or GITHUB_API_URL"),
            USAGE,
        ),
    };

    if config.credentials.basic_auth().is_none() {
        warn!("No API credentials set; private projects and log archives need --api-user and --api-token");
    }

    if let Err(e) = ensure_output_dir(&config.output_dir) {
        fail(
            ErrorBuilder::new("Failed to create output directory")
                .cause(format!("{:#}", e))
                .fix("Choose a directory you can write to"),
            CANT_CREATE,
        );
    }

    let client = match GitHubClient::new(config.credentials.clone()) {
        Ok(client) => client,
        Err(e) => fail(ErrorBuilder::new("Failed to set up HTTP client").cause(format!("{:#}", e)), ERROR),
    };

    match fetch_logs(&client, &config) {
        Ok(report) => {
            info!(
                "Listed {} runs, {} matched: {} downloaded ({} bytes), {} already present",
                report.runs_seen, report.selected, report.downloaded, report.bytes, report.skipped
            );
            info!("{} errors fetching logs", report.errors);
        }
        Err(e) => fail(listing_failure(&e), ERROR),
    }
}
