// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command line interface for fetch-actions-logs.
//!
//! ## Example
//!
//! ```no_run
//! use clap::Parser;
//! use fetch_actions_logs::cli::{normalize_args, Cli};
//!
//! let cli = Cli::parse_from(normalize_args(["fetch-actions-logs", "-conclusion", "failure", "rclone/rclone", "logs"]));
//! let config = cli.into_config(|key| std::env::var(key).ok())?;
//! assert_eq!(config.conclusion.conclusion(), Some("failure"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod args;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub use args::{normalize_args, LEGACY_LONG_FLAGS};

use crate::config::{Credentials, FetchConfig, Project, DEFAULT_API_URL, ENV_API_URL};
use crate::filter::ConclusionFilter;
use crate::github::RunQuery;

const LONG_ABOUT: &str = "\
Fetch the GitHub Actions logs of a project (eg rclone/rclone) into the
output directory. The directory is created if it does not exist.

The logs are the zip files you would download from the web site with the
entire log of a workflow run. They are stored as RUNID.zip, where RUNID is
the numerical run ID. Re-running skips every file already in the output
directory.

Supply a GitHub user and API token with --api-user and --api-token, or set
GITHUB_USER and GITHUB_TOKEN.

Logs are not kept forever: after a while, fetching them fails with
410 Gone.

Example:
  fetch-actions-logs --conclusion failure --user ncw rclone/rclone logs";

/// Download GitHub Actions workflow run logs into a local directory.
#[derive(Debug, Parser)]
#[command(name = "fetch-actions-logs")]
#[command(version)]
#[command(about = "Download GitHub Actions workflow run logs into a local directory.")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// Project to fetch logs for, in owner/project form
    #[arg(value_name = "PROJECT")]
    pub project: Project,

    /// Directory to store the log archives in
    #[arg(value_name = "DIRECTORY")]
    pub output_dir: PathBuf,

    /// Fetch logs for the user specified
    #[arg(long = "user", value_name = "LOGIN")]
    pub actor: Option<String>,

    /// Fetch logs for the branch specified
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Fetch logs for the event specified (eg push, pull_request, issue)
    #[arg(long)]
    pub event: Option<String>,

    /// Fetch logs for the status specified (eg completed)
    #[arg(long, default_value = "completed")]
    pub status: String,

    /// Fetch logs for the conclusion specified (eg success, failure, neutral,
    /// cancelled, timed_out, or action_required); empty for all
    #[arg(long, default_value = "neutral")]
    pub conclusion: String,

    /// API key user (or set GITHUB_USER)
    #[arg(long)]
    pub api_user: Option<String>,

    /// API key password (or set GITHUB_TOKEN)
    #[arg(long)]
    pub api_token: Option<String>,

    /// API root URL, for GitHub Enterprise (or set GITHUB_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Quiet mode: only warnings and errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode: detailed output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the fetch configuration, reading fallbacks through `env`.
    pub fn into_config(self, env: impl Fn(&str) -> Option<String>) -> Result<FetchConfig> {
        let api_url = self
            .api_url
            .or_else(|| env(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let query = RunQuery::new()
            .actor(self.actor.unwrap_or_default())
            .branch(self.branch)
            .event(self.event.unwrap_or_default())
            .status(self.status);

        let credentials = Credentials::resolve(self.api_user, self.api_token, &env);

        let config = FetchConfig::new(self.project, self.output_dir)
            .with_api_url(&api_url)?
            .with_query(query)
            .with_conclusion(ConclusionFilter::new(self.conclusion))
            .with_credentials(credentials);

        Ok(config)
    }
}
