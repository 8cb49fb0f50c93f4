//! Content record parsing.
//!
//! A content file is a flat list of records separated by the line separator
//! (default `-----`). Each record is `<key><value separator><value>` (default
//! separator `:`):
//!
//! ```text
//! Title: Home
//! -----
//! Text: Welcome to the site.
//! Times: 10:30
//! ```
//!
//! Keys are normalised to camel case (`Some weird field-name` becomes
//! `someWeirdFieldName`), values are trimmed, and later records overwrite
//! earlier ones with the same key.

use std::collections::BTreeMap;
use std::path::Path;

use quire_config::SeparatorsConfig;

/// Parsed content record: normalised key to trimmed value.
pub type Record = BTreeMap<String, String>;

/// Parse content text into a record.
///
/// Chunks without a value separator, or whose key normalises to nothing,
/// are dropped.
#[must_use]
pub fn parse_record(text: &str, separators: &SeparatorsConfig) -> Record {
    let mut record = Record::new();

    for chunk in text.split(separators.line.as_str()) {
        let Some((raw_key, value)) = chunk.split_once(separators.values.as_str()) else {
            continue;
        };

        let key = camel_case(raw_key);
        if key.is_empty() {
            continue;
        }

        record.insert(key, value.trim().to_owned());
    }

    record
}

/// Read and parse a content file.
///
/// A missing path or an unreadable file yields an empty record. Invalid
/// UTF-8 is replaced rather than rejected.
#[must_use]
pub fn read_record(path: Option<&Path>, separators: &SeparatorsConfig) -> Record {
    let Some(path) = path else {
        return Record::new();
    };

    match std::fs::read(path) {
        Ok(bytes) => parse_record(&String::from_utf8_lossy(&bytes), separators),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Content file not readable");
            Record::new()
        }
    }
}

/// Normalise a raw key to a single camel-case token.
///
/// Words split on non-alphanumeric characters, lower-to-upper transitions,
/// acronym ends (`XMLHttp` -> `XML`, `Http`) and letter/digit boundaries.
#[must_use]
pub fn camel_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());

    for (i, word) in words(raw).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            result.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }

    result
}

fn words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = prev.is_ascii_digit() != c.is_ascii_digit()
                || (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn separators() -> SeparatorsConfig {
        SeparatorsConfig::default()
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case("Title"), "title");
        assert_eq!(camel_case("  Some weird field-name "), "someWeirdFieldName");
        assert_eq!(camel_case("someWeirdFieldName"), "someWeirdFieldName");
        assert_eq!(camel_case("SOME_CONSTANT"), "someConstant");
        assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
        assert_eq!(camel_case("foo2bar"), "foo2Bar");
        assert_eq!(camel_case("--"), "");
    }

    #[test]
    fn test_parse_basic_record() {
        let text = "Title: Home\n-----\nText: Hello world\n";

        let result = parse_record(text, &separators());

        assert_eq!(result, record(&[("text", "Hello world"), ("title", "Home")]));
    }

    #[test]
    fn test_parse_value_keeps_later_separators() {
        let result = parse_record("Time: 10:30:00", &separators());

        assert_eq!(result["time"], "10:30:00");
    }

    #[test]
    fn test_parse_multiline_value_trimmed() {
        let text = "Text:\n\n  First line.\n  Second line.\n\n-----\nTitle: T";

        let result = parse_record(text, &separators());

        assert_eq!(result["text"], "First line.\n  Second line.");
    }

    #[test]
    fn test_parse_last_write_wins() {
        let text = "Title: One\n-----\nTitle: Two";

        let result = parse_record(text, &separators());

        assert_eq!(result, record(&[("title", "Two")]));
    }

    #[test]
    fn test_parse_drops_unparseable_chunks() {
        let text = "just some prose\n-----\n: no key\n-----\nTitle: Kept";

        let result = parse_record(text, &separators());

        assert_eq!(result, record(&[("title", "Kept")]));
    }

    #[test]
    fn test_parse_custom_separators() {
        let separators = SeparatorsConfig {
            line: "===".to_owned(),
            values: "=".to_owned(),
        };

        let result = parse_record("a = 1\n===\nb = x=y", &separators);

        assert_eq!(result, record(&[("a", "1"), ("b", "x=y")]));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_record("", &separators()).is_empty());
    }

    #[test]
    fn test_read_record_absent_path() {
        assert!(read_record(None, &separators()).is_empty());
    }

    #[test]
    fn test_read_record_missing_file() {
        let result = read_record(Some(Path::new("/nonexistent/page.md")), &separators());
        assert!(result.is_empty());
    }

    #[test]
    fn test_read_record_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("home.md");
        std::fs::write(&path, "Title: Home\n-----\nSome weird field name: Test").unwrap();

        let result = read_record(Some(&path), &separators());

        assert_eq!(
            result,
            record(&[("someWeirdFieldName", "Test"), ("title", "Home")])
        );
    }

    #[test]
    fn test_read_record_replaces_invalid_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("page.md");
        std::fs::write(&path, b"Title: Caf\xe9\n-----\nText: Kept").unwrap();

        let result = read_record(Some(&path), &separators());

        assert_eq!(
            result,
            record(&[("text", "Kept"), ("title", "Caf\u{fffd}")])
        );
    }

    #[test]
    fn test_read_record_unreadable_file_warns() {
        let temp_dir = tempfile::tempdir().unwrap();
        let logs = crate::tests::CapturedLogs::default();

        let result = tracing::subscriber::with_default(logs.subscriber(), || {
            read_record(Some(temp_dir.path()), &separators())
        });

        assert!(result.is_empty());
        let logs = logs.contents();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("Content file not readable"), "{logs}");
    }
}
