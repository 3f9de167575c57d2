// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Blocking HTTP client for the GitHub API.

use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiResponse, Transport};
use crate::config::Credentials;
use crate::error::ApiError;

/// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("fetch-actions-logs/", env!("CARGO_PKG_VERSION"));

/// Media type recommended by the REST API docs.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::blocking::Client,
    credentials: Credentials,
}

impl GitHubClient {
    /// Create a client sending `credentials` as Basic auth when both parts
    /// are set.
    ///
    /// The blocking client's default 30 second request timeout is turned
    /// off: log archives can be large, and there is no retry to fall back on.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client, credentials })
    }
}

impl Transport for GitHubClient {
    fn get(&self, url: &str) -> Result<ApiResponse> {
        let mut request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        if let Some((user, token)) = self.credentials.basic_auth() {
            request = request.basic_auth(user, Some(token));
        }

        debug!("GET {}", url);
        let response = request.send().map_err(|e| {
            anyhow!(ApiError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .unwrap_or_else(|e| format!("error reading body: {}", e));
            return Err(anyhow!(ApiError::bad_status(url, status.as_u16(), &body)));
        }

        let link = link_header(response.headers(), url);
        Ok(ApiResponse::new(link, response))
    }
}

/// The `Link` header as text. A header that is not visible ASCII is
/// dropped with a warning, which ends pagination at this page.
fn link_header(headers: &HeaderMap, url: &str) -> Option<String> {
    let value = headers.get(LINK)?;
    match value.to_str() {
        Ok(text) => Some(text.to_string()),
        Err(_) => {
            warn!("Ignoring undecodable Link header from {}: {:?}", url, value);
            None
        }
    }
}
