//! Pages created at runtime from in-memory properties.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::page::{Page, PageId, PageKind};
use crate::tree::PageTree;

/// Properties of a virtual page.
///
/// `index`, `identifier` and `template` become structural fields; anything
/// else lands in the page's field map. Deserializes from a flat table:
///
/// ```
/// use quire_site::VirtualPageProps;
///
/// let props: VirtualPageProps = serde_json::from_str(
///     r#"{"identifier": "tags/rust", "template": "tag", "index": 3, "title": "Rust"}"#,
/// )
/// .unwrap();
/// assert_eq!(props.index, 3);
/// assert_eq!(props.fields["title"], "Rust");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VirtualPageProps {
    /// Ordering index among siblings.
    #[serde(default)]
    pub index: u32,
    /// Identifier relative to the content root.
    pub identifier: String,
    /// Template name.
    #[serde(default)]
    pub template: String,
    /// Remaining properties.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl VirtualPageProps {
    /// Properties with index 0 and no extra fields.
    pub fn new(identifier: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            index: 0,
            identifier: identifier.into(),
            template: template.into(),
            fields: Map::new(),
        }
    }

    /// Set the ordering index.
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Add a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl PageTree {
    /// Insert a virtual page under `parent` and return its handle.
    ///
    /// The page is appended to the parent's children, which are then stably
    /// sorted by index: equal indices keep their insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_virtual_page(&mut self, parent: PageId, props: VirtualPageProps) -> PageId {
        let VirtualPageProps {
            index,
            identifier,
            template,
            fields,
        } = props;

        let id = PageId(self.pages.len());
        tracing::debug!(identifier = %identifier, parent = parent.0, "Adding virtual page");

        self.pages.push(Page {
            id,
            kind: PageKind::Virtual,
            index,
            url: self.options.page_url(&identifier),
            output: self.options.page_output(&identifier),
            identifier,
            template,
            parent: Some(parent),
            children: Vec::new(),
            assets: Vec::new(),
            fields,
        });

        let mut siblings = std::mem::take(&mut self.pages[parent.0].children);
        siblings.push(id);
        siblings.sort_by_key(|&sibling| self.pages[sibling.0].index);
        self.pages[parent.0].children = siblings;

        id
    }
}
