// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Response contracts for the workflow runs listing.
//!
//! Only the fields the fetch logic reads are decoded; serde ignores the
//! rest of the (large) upstream schema.

use serde::Deserialize;

/// A single workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    /// `None` while the run has not finished.
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
}

/// One page of `GET /repos/{owner}/{repo}/actions/runs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunsPage {
    /// Total matching runs across all pages.
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}
