// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download status and the per-fetch report.

use std::fmt;

/// Status of a single archive download.
///
/// ```text
/// NotStarted ──(target exists)──▶ Skipped
///     │
///     ▼
/// Requesting ──▶ Streaming ──▶ RenamePending ──▶ Done
///     │              │               │
///     └──────────────┴───────────────┴──▶ Errored
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    /// Nothing done yet
    NotStarted,
    /// Target already on disk, no request made
    Skipped,
    /// Waiting for the archive response
    Requesting,
    /// Copying the body into the temporary file
    Streaming,
    /// Body written, temporary file about to be moved into place
    RenamePending,
    /// Archive in place
    Done { bytes: u64 },
    /// Failed while in `stage`; any temporary file is left behind
    Errored { stage: &'static str, error: String },
}

impl DownloadStatus {
    /// Returns true once no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadStatus::Skipped | DownloadStatus::Done { .. } | DownloadStatus::Errored { .. }
        )
    }

    /// Short lowercase name, used in logs and error stages.
    pub fn name(&self) -> &'static str {
        match self {
            DownloadStatus::NotStarted => "not started",
            DownloadStatus::Skipped => "skipped",
            DownloadStatus::Requesting => "requesting",
            DownloadStatus::Streaming => "streaming",
            DownloadStatus::RenamePending => "rename pending",
            DownloadStatus::Done { .. } => "done",
            DownloadStatus::Errored { .. } => "errored",
        }
    }

    /// The `Errored` status for a failure in the current stage.
    pub(crate) fn fail(&self, error: &anyhow::Error) -> DownloadStatus {
        DownloadStatus::Errored {
            stage: self.name(),
            error: format!("{:#}", error),
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadStatus::Done { bytes } => write!(f, "done ({} bytes)", bytes),
            DownloadStatus::Errored { stage, error } => write!(f, "failed while {}: {}", stage, error),
            other => f.write_str(other.name()),
        }
    }
}

/// Totals for one fetch.
///
/// The error count is the only failure signal that survives the loop;
/// the per-run log line names which runs failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Listing pages received
    pub pages: u64,
    /// Runs listed by the server
    pub runs_seen: u64,
    /// Runs that passed the conclusion filter
    pub selected: u64,
    /// Archives written this time
    pub downloaded: u64,
    /// Archives already present
    pub skipped: u64,
    /// Bytes written for new archives
    pub bytes: u64,
    /// Failed downloads
    pub errors: u64,
}

impl FetchReport {
    /// Account for a finished download. Statuses still in flight are ignored.
    pub fn record(&mut self, status: &DownloadStatus) {
        if !status.is_terminal() {
            return;
        }
        match status {
            DownloadStatus::Skipped => self.skipped += 1,
            DownloadStatus::Done { bytes } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            _ => self.errors += 1,
        }
    }
}
