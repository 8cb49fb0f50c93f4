//! Shortcode expansion.
//!
//! Shortcodes are bracketed macros inside content text:
//!
//! ```text
//! [year]
//! [youtube="dQw4w9WgXcQ"]
//! [figure src="a.gif" caption="Spacer" wide]
//! [highlight]important[/highlight]
//! ```
//!
//! Attributes are collected into a string map. The shortcode name is itself
//! an attribute (holding its `="value"` if given), bare flags map to the
//! empty string. Names without a registered handler are left as written.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

/// Attributes of one shortcode occurrence.
pub type ShortcodeAttrs = BTreeMap<String, String>;

type Handler = Arc<dyn Fn(&ShortcodeAttrs, Option<&str>) -> String + Send + Sync>;

static OPENING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[([A-Za-z][\w-]*)((?:\s*=\s*"[^"]*")?(?:\s+[A-Za-z][\w-]*(?:\s*=\s*"[^"]*")?)*)\s*\]"#,
    )
    .expect("invalid shortcode regex")
});

static ATTR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z][\w-]*)(?:\s*=\s*"([^"]*)")?"#).expect("invalid attribute regex")
});

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\w-]+)\}").expect("invalid placeholder regex"));

/// Registry of shortcode handlers.
#[derive(Clone, Default)]
pub struct Shortcodes {
    handlers: BTreeMap<String, Handler>,
}

impl Shortcodes {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of string-template shortcodes.
    ///
    /// In a template, `{content}` is replaced by the enclosed text and any
    /// other `{key}` by the attribute of that name. Unknown placeholders
    /// become empty.
    #[must_use]
    pub fn from_templates(templates: &BTreeMap<String, String>) -> Self {
        let mut shortcodes = Self::new();
        for (name, template) in templates {
            shortcodes.register_template(name.clone(), template.clone());
        }
        shortcodes
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&ShortcodeAttrs, Option<&str>) -> String + Send + Sync + 'static,
    ) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Register a string-template handler.
    pub fn register_template(&mut self, name: impl Into<String>, template: String) {
        self.register(name, move |attrs, content| {
            PLACEHOLDER_PATTERN
                .replace_all(&template, |caps: &Captures<'_>| match &caps[1] {
                    "content" => content.unwrap_or_default().to_owned(),
                    key => attrs.get(key).cloned().unwrap_or_default(),
                })
                .into_owned()
        });
    }

    /// True if `name` has a handler.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Expand every registered shortcode in `text`.
    ///
    /// An opening tag followed later by `[/name]` is an enclosing shortcode;
    /// its content is expanded before the handler sees it.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        if self.handlers.is_empty() {
            return text.to_owned();
        }

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;

        while let Some(caps) = OPENING_PATTERN.captures_at(text, cursor) {
            let Some(tag) = caps.get(0) else {
                break;
            };
            let name = &caps[1];

            let Some(handler) = self.handlers.get(name) else {
                result.push_str(&text[cursor..tag.end()]);
                cursor = tag.end();
                continue;
            };

            result.push_str(&text[cursor..tag.start()]);
            let attrs = parse_attrs(name, &caps[2]);

            let closing = format!("[/{name}]");
            let (content, end) = match text[tag.end()..].find(&closing) {
                Some(offset) => {
                    let inner = &text[tag.end()..tag.end() + offset];
                    (Some(self.expand(inner)), tag.end() + offset + closing.len())
                }
                None => (None, tag.end()),
            };

            result.push_str(&handler(&attrs, content.as_deref()));
            cursor = end;
        }

        result.push_str(&text[cursor..]);
        result
    }
}

impl fmt::Debug for Shortcodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcodes")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn parse_attrs(name: &str, rest: &str) -> ShortcodeAttrs {
    let source = format!("{name}{rest}");
    ATTR_PATTERN
        .captures_iter(&source)
        .map(|caps| {
            let value = caps.get(2).map_or("", |m| m.as_str());
            (caps[1].to_owned(), value.to_owned())
        })
        .collect()
}
