//! Natural (numeric-aware) string ordering.
//!
//! Runs of ASCII digits compare by numeric value, everything else compares
//! lexically, so `"2-foo"` sorts before `"10-bar"`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Compare two strings in natural order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        match (left.next(), right.next()) {
            // "01" and "1" are numerically equal; fall back to a total order
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunks(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Sort paths in natural order of their file names.
pub fn sort_by_file_name(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
}

/// Split a string into alternating digit and non-digit runs.
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

fn compare_chunks(a: &str, b: &str) -> Ordering {
    let a_digits = a.starts_with(|c: char| c.is_ascii_digit());
    let b_digits = b.starts_with(|c: char| c.is_ascii_digit());

    match (a_digits, b_digits) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut items: Vec<String> = items.iter().map(|&s| s.to_owned()).collect();
        items.sort_by(|a, b| natural_cmp(a, b));
        items
    }

    #[test]
    fn test_numeric_prefixes_sort_by_value() {
        assert_eq!(sorted(&["2-x", "10-y", "1-z"]), vec!["1-z", "2-x", "10-y"]);
    }

    #[test]
    fn test_digits_before_letters() {
        assert_eq!(sorted(&["b", "a", "1-c"]), vec!["1-c", "a", "b"]);
    }

    #[test]
    fn test_embedded_numbers() {
        assert_eq!(
            sorted(&["img12.png", "img2.png", "img1.png"]),
            vec!["img1.png", "img2.png", "img12.png"]
        );
    }

    #[test]
    fn test_leading_zeros_are_total() {
        assert_eq!(natural_cmp("01", "1"), "01".cmp("1"));
        assert_eq!(natural_cmp("a", "a"), Ordering::Equal);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("page", "page2"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_file_name_ignores_directories() {
        let mut paths = vec![
            PathBuf::from("/z/10-b.gif"),
            PathBuf::from("/a/2-a.gif"),
        ];

        sort_by_file_name(&mut paths);

        assert_eq!(
            paths,
            vec![PathBuf::from("/a/2-a.gif"), PathBuf::from("/z/10-b.gif")]
        );
    }
}
