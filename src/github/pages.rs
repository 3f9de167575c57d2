// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Walks the paginated workflow runs listing.

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::io::Read;
use tracing::{debug, info};

use super::link::next_link;
use super::types::RunsPage;
use super::Transport;
use crate::error::ApiError;

/// Iterator over listing pages.
///
/// Each step issues one GET and follows the `rel="next"` link of the
/// response. Iteration ends when a response has no next link, or right
/// after yielding an error.
pub struct Pages<'a, T: Transport + ?Sized> {
    transport: &'a T,
    next_url: Option<String>,
    /// Runs seen so far, across pages.
    fetched: u64,
}

impl<'a, T: Transport + ?Sized> Pages<'a, T> {
    pub fn new(transport: &'a T, start: Url) -> Self {
        Self {
            transport,
            next_url: Some(start.into()),
            fetched: 0,
        }
    }

    /// Total number of runs received so far.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    /// URL the next call to `next` will request, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    fn fetch_page(&self, url: &str) -> Result<(RunsPage, Option<String>)> {
        let response = self
            .transport
            .get(url)
            .context("failed to get workflow runs")?;

        let mut body = Vec::new();
        let mut reader = response.body;
        reader
            .read_to_end(&mut body)
            .with_context(|| format!("failed to read workflow runs from {}", url))?;

        let page: RunsPage = serde_json::from_slice(&body).map_err(|e| {
            anyhow!(ApiError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;

        let next = response.link.as_deref().and_then(next_link);
        Ok((page, next))
    }
}

impl<T: Transport + ?Sized> Iterator for Pages<'_, T> {
    type Item = Result<RunsPage>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next_url.take()?;
        debug!("Requesting listing page {}", url);

        match self.fetch_page(&url) {
            Ok((page, next)) => {
                self.fetched += page.workflow_runs.len() as u64;
                info!("Fetched {}/{} workflow runs", self.fetched, page.total_count);
                if let Some(next) = &next {
                    debug!("Next page: {}", next);
                }
                self.next_url = next;
                Some(Ok(page))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
