//! Ordering prefixes, identifiers and URL helpers.
//!
//! A numeral followed by a dash at the start of a file or directory name
//! (`12-about`) sets the node's manual ordering index. The prefix never
//! appears in identifiers, URLs or output paths.

use std::path::{Component, Path};

/// Split a name into its ordering index and the name without prefix.
///
/// Names without a `NN-` prefix, or with a numeral too large to represent,
/// get index 0.
fn split_index(name: &str) -> (u32, &str) {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match name[digits..].strip_prefix('-') {
        Some(rest) if digits > 0 => (name[..digits].parse().unwrap_or(0), rest),
        _ => (0, name),
    }
}

/// Ordering index encoded in a file or directory name.
///
/// # Examples
///
/// - `12-about` -> `12`
/// - `0-draft` -> `0`
/// - `about` -> `0`
#[must_use]
pub fn parse_index(name: &str) -> u32 {
    split_index(name).0
}

/// Name with its ordering prefix removed (`12-about` -> `about`).
#[must_use]
pub fn strip_index(name: &str) -> &str {
    split_index(name).1
}

/// Identifier for a directory relative to the content root.
///
/// Every segment loses its ordering prefix; segments are joined with `/`.
/// The content root itself has the empty identifier.
#[must_use]
pub fn identifier_for(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(strip_index(&segment.to_string_lossy()).to_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join two identifier parts with `/`, skipping an empty prefix.
#[must_use]
pub fn join_identifier(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Prefix `url` with `base` unless it already starts with it.
///
/// Idempotent: `basepath(base, &basepath(base, x)) == basepath(base, x)`.
#[must_use]
pub fn basepath(base: &str, url: &str) -> String {
    if url.starts_with(base) {
        url.to_owned()
    } else {
        format!("{base}{url}")
    }
}
