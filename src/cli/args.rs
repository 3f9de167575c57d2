// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Legacy flag spelling.
//!
//! Earlier versions of the tool took Go-style single-dash long flags
//! (`-conclusion failure`, `-api-token=...`). These are rewritten to the
//! `--` form before clap sees them, so old scripts keep working.

use std::ffi::OsString;

/// Long flags accepted with a single dash.
pub const LEGACY_LONG_FLAGS: &[&str] = &[
    "user",
    "branch",
    "event",
    "status",
    "conclusion",
    "api-user",
    "api-token",
    "api-url",
    "quiet",
    "verbose",
    "help",
    "version",
];

/// Rewrite `-flag` / `-flag=value` to `--flag` / `--flag=value` for known flags.
///
/// Everything after a bare `--` is left alone, as are arguments that are
/// not valid UTF-8.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in args {
        let arg: OsString = arg.into();
        if passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        match arg.to_str().and_then(rewrite_legacy) {
            Some(rewritten) => out.push(rewritten.into()),
            None => out.push(arg),
        }
    }

    out
}

fn rewrite_legacy(arg: &str) -> Option<String> {
    let body = arg.strip_prefix('-')?;
    if body.starts_with('-') {
        return None;
    }
    let name = body.split_once('=').map_or(body, |(name, _)| name);
    if LEGACY_LONG_FLAGS.contains(&name) {
        Some(format!("-{}", arg))
    } else {
        None
    }
}
