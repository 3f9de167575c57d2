// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! GitHub Actions API access.
//!
//! - [`query`] builds the listing and archive URLs
//! - [`pages`] walks the paginated run listing
//! - [`link`] parses the `Link` response header
//! - [`client`] is the blocking HTTP [`Transport`]
//!
//! # Example
//!
//! ```no_run
//! use fetch_actions_logs::config::{Credentials, FetchConfig};
//! use fetch_actions_logs::github::{Endpoints, GitHubClient, Pages, RunQuery};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = FetchConfig::new("rclone/rclone".parse()?, "logs")
//!     .with_query(RunQuery::new().branch("master"));
//! let client = GitHubClient::new(Credentials::default())?;
//! let endpoints = Endpoints::new(&config.api_url, &config.project)?;
//!
//! for page in Pages::new(&client, endpoints.runs(&config.query)?) {
//!     for run in page?.workflow_runs {
//!         println!("{} {:?}", run.id, run.conclusion);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod link;
pub mod pages;
pub mod query;
pub mod types;

use anyhow::Result;
use std::io::Read;

pub use client::GitHubClient;
pub use link::{next_link, parse_link_header, Link};
pub use pages::Pages;
pub use query::{Endpoints, RunQuery};
pub use types::{RunsPage, WorkflowRun};

/// A successful (200 OK) response.
pub struct ApiResponse {
    /// Raw `Link` header, if the server sent one.
    pub link: Option<String>,
    /// Response body, read incrementally.
    pub body: Box<dyn Read>,
}

impl ApiResponse {
    pub fn new(link: Option<String>, body: impl Read + 'static) -> Self {
        Self {
            link,
            body: Box::new(body),
        }
    }
}

impl std::fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResponse")
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

/// Authenticated GET against the API.
///
/// Implementations return an error for anything but a 200 response, so
/// callers only ever see bodies worth reading.
pub trait Transport {
    fn get(&self, url: &str) -> Result<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<ApiResponse> {
        (**self).get(url)
    }
}
