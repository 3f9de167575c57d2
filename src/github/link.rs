// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! `Link` header parsing (RFC 8288 style).
//!
//! GitHub paginates with headers such as:
//!
//! ```text
//! <https://api.github.com/repositories/1/actions/runs?page=2>; rel="next",
//! <https://api.github.com/repositories/1/actions/runs?page=5>; rel="last"
//! ```
//!
//! The parser is lenient: malformed entries are skipped, never reported.

/// One entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The URI between `<` and `>`.
    pub target: String,
    /// Relation types from every `rel` parameter.
    pub relations: Vec<String>,
}

impl Link {
    /// Whether this link carries relation `rel` (ASCII case-insensitive).
    pub fn has_relation(&self, rel: &str) -> bool {
        self.relations.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse every well-formed entry of a `Link` header.
pub fn parse_link_header(header: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let Some(after_open) = rest.strip_prefix('<') else {
            // Not a link-value: drop everything up to the next entry
            rest = rest.find(',').map_or("", |i| &rest[i + 1..]);
            continue;
        };
        let Some(close) = after_open.find('>') else {
            break;
        };

        let target = after_open[..close].trim().to_string();
        let (params, remaining) = parse_params(&after_open[close + 1..]);
        rest = remaining;

        let relations = params
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("rel"))
            .flat_map(|(_, value)| value.split_whitespace().map(str::to_string))
            .collect();

        links.push(Link { target, relations });
    }

    links
}

/// The first non-empty `rel="next"` target in `header`.
pub fn next_link(header: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|link| link.has_relation("next") && !link.target.is_empty())
        .map(|link| link.target)
}

/// Parse `; name=value` pairs up to the end of the current entry.
///
/// Returns the parameters and the input after the entry's trailing comma.
fn parse_params(mut rest: &str) -> (Vec<(String, String)>, &str) {
    let mut params = Vec::new();

    loop {
        rest = rest.trim_start();
        match rest.chars().next() {
            None => return (params, rest),
            Some(',') => return (params, &rest[1..]),
            Some(';') => rest = &rest[1..],
            Some(_) => {
                let end = rest.find(['=', ';', ',']).unwrap_or(rest.len());
                let name = rest[..end].trim().to_string();
                rest = &rest[end..];

                let mut value = String::new();
                if let Some(after_eq) = rest.strip_prefix('=') {
                    let (parsed, remaining) = parse_value(after_eq.trim_start());
                    value = parsed;
                    rest = remaining;
                }

                if !name.is_empty() {
                    params.push((name, value));
                }
            }
        }
    }
}

/// Parse a quoted-string or bare token parameter value.
fn parse_value(rest: &str) -> (String, &str) {
    if let Some(quoted) = rest.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => return (value, &quoted[i + 1..]),
                _ => value.push(c),
            }
        }
        // Unterminated quote swallows the rest of the header
        (value, "")
    } else {
        let end = rest.find([';', ',']).unwrap_or(rest.len());
        (rest[..end].trim().to_string(), &rest[end..])
    }
}
