// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types and consistent error formatting for fetch-actions-logs.
//!
//! [`ApiError`] describes failures talking to the GitHub API. Everything
//! else travels as [`anyhow::Error`] with context attached at each layer.
//! Fatal errors are rendered for the terminal with [`ErrorBuilder`].

use std::fmt;

/// Trailer appended to every formatted error.
pub const HELP_HINT: &str = "Run `fetch-actions-logs --help` for usage.";

/// Maximum number of response body bytes kept in an error message.
const MAX_BODY_CHARS: usize = 1024;

/// Error types specific to GitHub API requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be built or sent, or no response arrived.
    Request { url: String, message: String },
    /// The server answered with something other than 200 OK.
    BadStatus { url: String, status: u16, body: String },
    /// The listing response was not the JSON envelope we expect.
    Decode { url: String, message: String },
}

impl ApiError {
    /// Build a [`ApiError::BadStatus`], trimming very long bodies.
    pub fn bad_status(url: impl Into<String>, status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > MAX_BODY_CHARS {
            let mut cut: String = body.chars().take(MAX_BODY_CHARS).collect();
            cut.push_str("...");
            cut
        } else {
            body.to_string()
        };
        Self::BadStatus { url: url.into(), status, body }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { url, message } => {
                write!(f, "request to {} failed: {}", url, message)
            }
            Self::BadStatus { url, status: 410, body } => write!(
                f,
                "logs at {} are no longer available (HTTP 410 Gone): {}",
                url, body
            ),
            Self::BadStatus { url, status, body } => {
                write!(f, "bad status {} fetching {}: {}", status, url, body)
            }
            Self::Decode { url, message } => {
                write!(f, "failed to decode response from {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Builder for constructing formatted error messages.
///
/// # Example
///
/// ```
/// use fetch_actions_logs::error::ErrorBuilder;
///
/// let error = ErrorBuilder::new("Failed to create output directory")
///     .cause("Permission denied")
///     .fix("Choose a writable directory")
///     .build();
/// assert!(error.contains("[✗] Failed to create output directory"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    title: String,
    causes: Vec<String>,
    fixes: Vec<String>,
}

impl ErrorBuilder {
    /// Create a new error builder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            causes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Add a possible cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a suggested fix.
    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    /// Build the formatted error message.
    pub fn build(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[✗] {}\n", self.title)?;

        if !self.causes.is_empty() {
            writeln!(f, "Possible causes:")?;
            for cause in &self.causes {
                writeln!(f, "  - {}", cause)?;
            }
            writeln!(f)?;
        }

        if !self.fixes.is_empty() {
            writeln!(f, "Try these fixes:")?;
            for (i, fix) in self.fixes.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, fix)?;
            }
            writeln!(f)?;
        }

        f.write_str(HELP_HINT)
    }
}

/// Describe a fatal listing failure, with hints chosen from the API status.
pub fn listing_failure(err: &anyhow::Error) -> ErrorBuilder {
    let builder = ErrorBuilder::new("Failed to list workflow runs").cause(format!("{:#}", err));

    match err.downcast_ref::<ApiError>().and_then(ApiError::status) {
        Some(401) => builder
            .cause("The API user or token was rejected")
            .fix("Check --api-user/--api-token or GITHUB_USER/GITHUB_TOKEN"),
        Some(403) => builder
            .cause("The token lacks access to this project, or the API rate limit was hit")
            .fix("Use a token with the repo/actions scope")
            .fix("Wait for the rate limit window to reset"),
        Some(404) => builder
            .cause("The project does not exist or is private")
            .fix("Check the <owner/project> argument")
            .fix("Supply credentials for private projects"),
        _ => builder
            .fix("Check network connectivity to the API")
            .fix("Re-run with --verbose for more detail"),
    }
}
