// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! fetch-actions-logs - download GitHub Actions logs library
//!
//! Lists a project's workflow runs through the GitHub REST API, keeps the
//! runs with a chosen conclusion, and saves each run's log archive as
//! `<run-id>.zip`. Archives already on disk are never fetched again.
//!
//! **List (paginated)** -> **Filter** -> **Download (tmp + rename)**
//!
//! # Core Modules
//!
//! - [`github`] - API transport, listing query, pagination, `Link` parsing
//! - [`filter`] - Local conclusion filter
//! - [`download`] - Idempotent archive downloads and the fetch report
//! - [`fetch`] - The list/filter/download loop
//! - [`config`] - Project, credentials and run configuration
//! - [`cli`] - Command line parsing
//! - [`error`] - API errors and consistent error formatting

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod github;
pub mod utils;

pub use config::{Credentials, FetchConfig, Project};
pub use download::{ArchiveDownloader, DownloadStatus, FetchReport};
pub use error::ApiError;
pub use fetch::{ensure_output_dir, fetch_logs};
pub use filter::ConclusionFilter;
pub use github::{ApiResponse, GitHubClient, RunQuery, Transport, WorkflowRun};
