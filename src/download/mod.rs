// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Log archive downloads.
//!
//! Each archive is streamed into `<id>.zip.tmp` and renamed to `<id>.zip`
//! only once the whole body is on disk, so a present `<id>.zip` always
//! means a complete download. That file's existence is the only state kept
//! between runs: re-running skips everything already fetched.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fetch_actions_logs::config::Credentials;
//! use fetch_actions_logs::download::{ArchiveDownloader, DownloadStatus};
//! use fetch_actions_logs::github::GitHubClient;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let client = GitHubClient::new(Credentials::new("octocat", "ghp_..."))?;
//! let downloader = ArchiveDownloader::new(&client);
//!
//! let url = "https://api.github.com/repos/rclone/rclone/actions/runs/30433642/logs";
//! match downloader.download(url, Path::new("logs/30433642.zip")) {
//!     DownloadStatus::Errored { stage, error } => eprintln!("failed while {}: {}", stage, error),
//!     status => println!("{}", status),
//! }
//! # Ok(())
//! # }
//! ```

pub mod manager;
pub mod types;

pub use manager::{ArchiveDownloader, TEMP_SUFFIX};
pub use types::{DownloadStatus, FetchReport};
