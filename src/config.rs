// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Run configuration: which project, where to put the logs, how to filter
//! and how to authenticate.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::filter::ConclusionFilter;
use crate::github::RunQuery;
use crate::utils::mask_sensitive;

/// Default GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding the API user.
pub const ENV_API_USER: &str = "GITHUB_USER";

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API root.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

static PROJECT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)$").expect("project pattern is valid")
});

/// A GitHub project in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    owner: String,
    name: String,
}

impl Project {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Project {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = PROJECT_PATTERN
            .captures(s)
            .ok_or_else(|| anyhow!("project {:?} must be in form user/project", s))?;
        Ok(Self {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        })
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// API credentials, passed through to the server as Basic auth.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    /// Resolve credentials from flags, falling back to the environment.
    ///
    /// A flag that was given, even as an empty string, wins over the
    /// environment variable.
    pub fn resolve(
        user_flag: Option<String>,
        token_flag: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            user: user_flag.or_else(|| env(ENV_API_USER)).unwrap_or_default(),
            token: token_flag.or_else(|| env(ENV_API_TOKEN)).unwrap_or_default(),
        }
    }

    /// User and token for Basic auth, only when both are set.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        if self.user.is_empty() || self.token.is_empty() {
            None
        } else {
            Some((&self.user, &self.token))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &mask_sensitive(&self.token, 4))
            .finish()
    }
}

/// Everything a fetch needs to know.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub project: Project,
    pub output_dir: PathBuf,
    /// Filters applied by the server.
    pub query: RunQuery,
    /// Filter applied locally to each run.
    pub conclusion: ConclusionFilter,
    pub credentials: Credentials,
    /// API root, always ending in `/`.
    pub api_url: Url,
}

impl FetchConfig {
    /// Create a config against the public GitHub API with default filters.
    pub fn new(project: Project, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project,
            output_dir: output_dir.into(),
            query: RunQuery::default(),
            conclusion: ConclusionFilter::any(),
            credentials: Credentials::default(),
            api_url: Url::parse(&format!("{}/", DEFAULT_API_URL)).expect("default API URL is valid"),
        }
    }

    /// Point the config at another API root (e.g. GitHub Enterprise).
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_query(mut self, query: RunQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_conclusion(mut self, conclusion: ConclusionFilter) -> Self {
        self.conclusion = conclusion;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Destination path for a run's log archive.
    pub fn archive_path(&self, run_id: u64) -> PathBuf {
        self.output_dir.join(format!("{}.zip", run_id))
    }
}

/// Parse an API root, making sure relative joins keep its path.
fn parse_api_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).with_context(|| format!("invalid API URL {:?}", raw))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("API URL {:?} cannot be used as a base URL", raw));
    }
    Ok(url)
}
