// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end fetch scenarios against an in-memory GitHub.
//!
//! The fake transport serves listing pages and log archives by URL and
//! records every request, so the tests can assert exactly what was fetched.

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

use fetch_actions_logs::{
    fetch_logs, ApiError, ApiResponse, ConclusionFilter, FetchConfig, RunQuery, Transport,
};

const RUNS_URL: &str = "https://api.github.com/repos/owner/repo/actions/runs?branch=master&status=completed";
const PAGE_2_URL: &str = "https://api.github.com/repositories/1/actions/runs?branch=master&status=completed&page=2";

// =============================================================================
// Fake GitHub
// =============================================================================

enum Archive {
    Zip(Vec<u8>),
    /// Sends the bytes, then the connection drops
    CutAfter(Vec<u8>),
}

struct DroppedConnection(Cursor<Vec<u8>>);

impl Read for DroppedConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionAborted, "connection aborted")),
            n => Ok(n),
        }
    }
}

#[derive(Default)]
struct FakeGitHub {
    listings: HashMap<String, (Option<String>, String)>,
    archives: HashMap<String, Archive>,
    requests: RefCell<Vec<String>>,
}

impl FakeGitHub {
    fn listing(mut self, url: &str, link: Option<&str>, body: String) -> Self {
        self.listings.insert(url.to_string(), (link.map(str::to_string), body));
        self
    }

    fn archive(mut self, run_id: u64, archive: Archive) -> Self {
        self.archives.insert(logs_url(run_id), archive);
        self
    }

    fn listing_requests(&self) -> usize {
        self.requests.borrow().iter().filter(|url| !url.ends_with("/logs")).count()
    }

    fn archive_requests(&self) -> Vec<String> {
        self.requests.borrow().iter().filter(|url| url.ends_with("/logs")).cloned().collect()
    }

    fn reset_requests(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl Transport for FakeGitHub {
    fn get(&self, url: &str) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(url.to_string());

        if let Some((link, body)) = self.listings.get(url) {
            return Ok(ApiResponse::new(link.clone(), Cursor::new(body.clone().into_bytes())));
        }
        match self.archives.get(url) {
            Some(Archive::Zip(bytes)) => Ok(ApiResponse::new(None, Cursor::new(bytes.clone()))),
            Some(Archive::CutAfter(bytes)) => {
                Ok(ApiResponse::new(None, DroppedConnection(Cursor::new(bytes.clone()))))
            }
            None => Err(anyhow!(ApiError::bad_status(url, 404, r#"{"message":"Not Found"}"#))),
        }
    }
}

fn logs_url(run_id: u64) -> String {
    format!("https://api.github.com/repos/owner/repo/actions/runs/{}/logs", run_id)
}

fn zip_for(run_id: u64) -> Vec<u8> {
    format!("PK\x03\x04 logs of run {}", run_id).into_bytes()
}

/// A listing page body; `failures` get conclusion "failure", the rest cycle
/// through other conclusions.
fn page_body(total: u64, ids: impl IntoIterator<Item = u64>, failures: &[u64]) -> String {
    let others = ["success", "neutral", "cancelled", "timed_out"];
    let runs: Vec<String> = ids
        .into_iter()
        .map(|id| {
            let conclusion = if failures.contains(&id) {
                "failure"
            } else {
                others[(id as usize) % others.len()]
            };
            format!(
                r#"{{"id": {}, "name": "CI", "head_branch": "master", "status": "completed", "conclusion": "{}", "run_number": {}}}"#,
                id, conclusion, id
            )
        })
        .collect();
    format!(r#"{{"total_count": {}, "workflow_runs": [{}]}}"#, total, runs.join(", "))
}

fn config(dir: &Path, conclusion: &str) -> FetchConfig {
    FetchConfig::new("owner/repo".parse().unwrap(), dir)
        .with_query(RunQuery::new().branch("master").status("completed"))
        .with_conclusion(ConclusionFilter::new(conclusion))
}

fn zip_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

/// Page 1: runs 1..=100 with failures 7, 42 and 99.
/// Page 2: runs 101..=110 with failure 105.
fn two_page_github() -> FakeGitHub {
    let next = format!("<{}>; rel=\"next\", <{}>; rel=\"last\"", PAGE_2_URL, PAGE_2_URL);
    let prev = format!("<{}>; rel=\"prev\", <{}>; rel=\"first\"", RUNS_URL, RUNS_URL);

    let mut github = FakeGitHub::default()
        .listing(RUNS_URL, Some(&next), page_body(110, 1..=100, &[7, 42, 99]))
        .listing(PAGE_2_URL, Some(&prev), page_body(110, 101..=110, &[105]));
    for id in 1..=110 {
        github = github.archive(id, Archive::Zip(zip_for(id)));
    }
    github
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_two_pages_download_only_failures() {
    let dir = TempDir::new().unwrap();
    let github = two_page_github();

    let report = fetch_logs(&github, &config(dir.path(), "failure")).unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.runs_seen, 110);
    assert_eq!(report.selected, 4);
    assert_eq!(report.downloaded, 4);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);

    assert_eq!(github.listing_requests(), 2);
    assert_eq!(
        github.archive_requests(),
        vec![logs_url(7), logs_url(42), logs_url(99), logs_url(105)]
    );
    assert_eq!(zip_files(dir.path()), vec!["105.zip", "42.zip", "7.zip", "99.zip"]);
    assert_eq!(fs::read(dir.path().join("42.zip")).unwrap(), zip_for(42));
}

#[test]
fn test_rerun_downloads_nothing_new() {
    let dir = TempDir::new().unwrap();
    let github = two_page_github();
    let config = config(dir.path(), "failure");

    fetch_logs(&github, &config).unwrap();
    github.reset_requests();

    let report = fetch_logs(&github, &config).unwrap();

    assert_eq!(report.selected, 4);
    assert_eq!(report.downloaded, 0);
    assert_eq!(report.skipped, 4);
    assert_eq!(report.errors, 0);
    assert!(github.archive_requests().is_empty());
    assert_eq!(github.listing_requests(), 2);
    assert_eq!(zip_files(dir.path()).len(), 4);
}

#[test]
fn test_unmatched_conclusion_downloads_nothing() {
    let dir = TempDir::new().unwrap();
    let github = two_page_github();

    let report = fetch_logs(&github, &config(dir.path(), "action_required")).unwrap();

    assert_eq!(report.runs_seen, 110);
    assert_eq!(report.selected, 0);
    assert_eq!(report.errors, 0);
    assert!(github.archive_requests().is_empty());
    assert!(zip_files(dir.path()).is_empty());
}

#[test]
fn test_empty_conclusion_selects_every_run() {
    let dir = TempDir::new().unwrap();
    let github = FakeGitHub::default()
        .listing(RUNS_URL, None, page_body(3, 1..=3, &[2]))
        .archive(1, Archive::Zip(zip_for(1)))
        .archive(2, Archive::Zip(zip_for(2)))
        .archive(3, Archive::Zip(zip_for(3)));

    let report = fetch_logs(&github, &config(dir.path(), "")).unwrap();

    assert_eq!(report.downloaded, 3);
    assert_eq!(zip_files(dir.path()), vec!["1.zip", "2.zip", "3.zip"]);
}

#[test]
fn test_network_cut_counts_one_error_and_continues() {
    let dir = TempDir::new().unwrap();
    let github = two_page_github().archive(42, Archive::CutAfter(b"PK\x03\x04 half a".to_vec()));

    let report = fetch_logs(&github, &config(dir.path(), "failure")).unwrap();

    assert_eq!(report.errors, 1);
    assert_eq!(report.downloaded, 3);
    assert!(!dir.path().join("42.zip").exists());
    assert!(dir.path().join("42.zip.tmp").exists());
    // Later runs were still fetched
    assert!(dir.path().join("99.zip").exists());
    assert!(dir.path().join("105.zip").exists());
}

#[test]
fn test_failed_download_is_retried_on_next_run() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), "failure");

    let flaky = two_page_github().archive(42, Archive::CutAfter(b"partial".to_vec()));
    assert_eq!(fetch_logs(&flaky, &config).unwrap().errors, 1);

    let healthy = two_page_github();
    let report = fetch_logs(&healthy, &config).unwrap();

    assert_eq!(report.errors, 0);
    assert_eq!(report.downloaded, 1);
    assert_eq!(healthy.archive_requests(), vec![logs_url(42)]);
    assert_eq!(fs::read(dir.path().join("42.zip")).unwrap(), zip_for(42));
    assert!(!dir.path().join("42.zip.tmp").exists());
}

#[test]
fn test_missing_archive_is_a_local_error() {
    let dir = TempDir::new().unwrap();
    let github = FakeGitHub::default()
        .listing(RUNS_URL, None, page_body(2, [1, 2], &[1, 2]))
        .archive(2, Archive::Zip(zip_for(2)));

    let report = fetch_logs(&github, &config(dir.path(), "failure")).unwrap();

    assert_eq!(report.errors, 1);
    assert_eq!(report.downloaded, 1);
    assert_eq!(zip_files(dir.path()), vec!["2.zip"]);
}

#[test]
fn test_listing_failure_aborts_after_earlier_pages() {
    let dir = TempDir::new().unwrap();
    let next = format!("<{}>; rel=\"next\"", PAGE_2_URL);
    let github = FakeGitHub::default()
        .listing(RUNS_URL, Some(&next), page_body(20, 1..=10, &[3]))
        .archive(3, Archive::Zip(zip_for(3)));

    let err = fetch_logs(&github, &config(dir.path(), "failure")).unwrap_err();

    assert_eq!(err.downcast_ref::<ApiError>().and_then(ApiError::status), Some(404));
    assert_eq!(zip_files(dir.path()), vec!["3.zip"]);
}

#[test]
fn test_bad_listing_json_is_fatal() {
    let dir = TempDir::new().unwrap();
    let github = FakeGitHub::default().listing(RUNS_URL, None, "{\"workflow_runs\": [".to_string());

    let err = fetch_logs(&github, &config(dir.path(), "failure")).unwrap_err();

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Decode { .. })));
}
