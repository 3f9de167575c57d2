// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Local run selection.
//!
//! Actor, branch, event and status are filtered by the server through the
//! listing query. Only the conclusion is checked here.

use crate::github::WorkflowRun;

/// Selects runs by exact, case-sensitive conclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConclusionFilter(Option<String>);

impl ConclusionFilter {
    /// Filter on `conclusion`; an empty string selects every run.
    pub fn new(conclusion: impl Into<String>) -> Self {
        let conclusion = conclusion.into();
        if conclusion.is_empty() {
            Self(None)
        } else {
            Self(Some(conclusion))
        }
    }

    /// A filter that selects every run.
    pub fn any() -> Self {
        Self(None)
    }

    pub fn conclusion(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `run` should have its logs downloaded.
    ///
    /// Runs without a conclusion (still in progress) compare as empty.
    pub fn selects(&self, run: &WorkflowRun) -> bool {
        match &self.0 {
            None => true,
            Some(wanted) => run.conclusion.as_deref().unwrap_or("") == wanted,
        }
    }
}
