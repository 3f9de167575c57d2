// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Listing query and endpoint URLs.

use anyhow::{Context, Result};
use reqwest::Url;

use crate::config::Project;

/// Server-side filters for the run listing.
///
/// Empty values are left out of the query string; anything else is passed
/// through unvalidated, the API decides what it accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunQuery {
    pub actor: String,
    pub branch: String,
    pub event: String,
    pub status: String,
}

impl RunQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Non-empty filters as query pairs, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("actor", self.actor.as_str()),
            ("branch", self.branch.as_str()),
            ("event", self.event.as_str()),
            ("status", self.status.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// URLs for one project's Actions endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// `<api>/repos/<owner>/<name>/`
    repo: Url,
}

impl Endpoints {
    /// `api_url` must end in `/` (see [`crate::config::FetchConfig`]).
    pub fn new(api_url: &Url, project: &Project) -> Result<Self> {
        let repo = api_url
            .join(&format!("repos/{}/{}/", project.owner(), project.name()))
            .with_context(|| format!("failed to build API URL for {}", project))?;
        Ok(Self { repo })
    }

    /// The run listing URL with `query` applied.
    pub fn runs(&self, query: &RunQuery) -> Result<Url> {
        let mut url = self.join("actions/runs")?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// The log archive URL for a run.
    pub fn logs(&self, run_id: u64) -> Result<Url> {
        self.join(&format!("actions/runs/{}/logs", run_id))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.repo
            .join(path)
            .with_context(|| format!("failed to join {:?} onto {}", path, self.repo))
    }
}
