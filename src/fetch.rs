// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The fetch loop: list runs page by page, filter them, download archives.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::config::FetchConfig;
use crate::download::{ArchiveDownloader, DownloadStatus, FetchReport};
use crate::github::{Endpoints, Pages, Transport, WorkflowRun};

/// Create the output directory, and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

/// Download the logs of every matching run of `config.project`.
///
/// Listing failures abort and are returned. Download failures are logged,
/// counted in [`FetchReport::errors`] and otherwise ignored.
pub fn fetch_logs<T: Transport + ?Sized>(transport: &T, config: &FetchConfig) -> Result<FetchReport> {
    let endpoints = Endpoints::new(&config.api_url, &config.project)?;
    let start = endpoints.runs(&config.query)?;
    let downloader = ArchiveDownloader::new(transport);
    let mut report = FetchReport::default();

    let mut pages = Pages::new(transport, start);
    loop {
        if let Some(url) = pages.next_url() {
            info!("Fetching workflow runs for {} from {}", config.project, url);
        }
        let Some(page) = pages.next() else { break };
        let page = page?;
        report.pages += 1;

        for run in &page.workflow_runs {
            report.runs_seen += 1;
            if !config.conclusion.selects(run) {
                continue;
            }
            report.selected += 1;

            let status = examine_run(&downloader, &endpoints, config, run);
            report.record(&status);
        }
    }

    Ok(report)
}

/// Download one selected run, logging the outcome.
fn examine_run<T: Transport + ?Sized>(
    downloader: &ArchiveDownloader<'_, T>,
    endpoints: &Endpoints,
    config: &FetchConfig,
    run: &WorkflowRun,
) -> DownloadStatus {
    info!(
        "Found run {}: status={:?} conclusion={:?} branch={:?}",
        run.id,
        run.status.as_deref().unwrap_or(""),
        run.conclusion.as_deref().unwrap_or(""),
        run.head_branch.as_deref().unwrap_or("")
    );

    let target = config.archive_path(run.id);
    let status = match endpoints.logs(run.id) {
        Ok(url) => downloader.download(url.as_str(), &target),
        Err(e) => DownloadStatus::NotStarted.fail(&e),
    };

    match &status {
        DownloadStatus::Skipped => {
            info!("Not fetching log for {}: {} already exists", run.id, target.display())
        }
        DownloadStatus::Errored { error, .. } => {
            error!("Failed to download {}: {}", target.display(), error)
        }
        _ => {}
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_output_dir_creates_parents() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("logs");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Already existing is fine
        ensure_output_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_fails_on_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, b"").unwrap();
        let err = ensure_output_dir(&file.join("logs")).unwrap_err();
        assert!(err.to_string().contains("failed to create output directory"));
    }
}
