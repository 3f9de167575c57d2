// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Idempotent log archive downloads.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, info};

use super::types::DownloadStatus;
use crate::github::Transport;
use crate::utils::append_suffix;

/// Suffix of the file an archive is streamed into before the rename.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Downloads one archive at a time through a [`Transport`].
pub struct ArchiveDownloader<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ArchiveDownloader<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch `url` into `target` unless `target` already exists.
    ///
    /// Always returns a terminal status. Failures are not retried and their
    /// temporary file stays on disk for inspection.
    pub fn download(&self, url: &str, target: &Path) -> DownloadStatus {
        if fs::metadata(target).is_ok() {
            debug!("{} already exists", target.display());
            return DownloadStatus::Skipped;
        }

        info!("Downloading {} from {}", target.display(), url);
        let mut status = DownloadStatus::NotStarted;
        match self.transfer(url, target, &mut status) {
            Ok(bytes) => {
                info!("Downloaded {} ({} bytes)", target.display(), bytes);
                DownloadStatus::Done { bytes }
            }
            Err(e) => status.fail(&e),
        }
    }

    /// Request, stream and rename, keeping `status` at the current stage.
    fn transfer(&self, url: &str, target: &Path, status: &mut DownloadStatus) -> Result<u64> {
        *status = DownloadStatus::Requesting;
        let response = self
            .transport
            .get(url)
            .context("download file request failed")?;

        *status = DownloadStatus::Streaming;
        let temp_path = append_suffix(target, TEMP_SUFFIX);
        let mut out = File::create(&temp_path)
            .with_context(|| format!("failed to open {}", temp_path.display()))?;

        let mut body = response.body;
        let bytes = io::copy(&mut body, &mut out).context("error while downloading")?;
        drop(body);

        out.sync_all()
            .with_context(|| format!("failed to close {}", temp_path.display()))?;
        drop(out);

        *status = DownloadStatus::RenamePending;
        debug!("Renaming {} to {}", temp_path.display(), target.display());
        fs::rename(&temp_path, target).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                target.display()
            )
        })?;

        Ok(bytes)
    }
}
