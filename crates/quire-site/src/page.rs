//! Page nodes stored in a [`PageTree`](crate::PageTree) arena.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::asset::{Asset, AssetCategory};

/// Handle of a page inside its tree.
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

impl PageId {
    /// Position of the page in the tree's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a page was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Directory holding a content file.
    Directory {
        /// The directory's content file.
        source: PathBuf,
    },
    /// In-memory page added with
    /// [`PageTree::add_virtual_page`](crate::PageTree::add_virtual_page).
    Virtual,
}

/// A page node: structural fields plus an open field map.
///
/// Structural fields are derived from the file system (or the virtual page
/// properties) and never change. The field map holds the parsed content
/// record for directory pages and the remaining properties for virtual
/// pages.
#[derive(Clone, Debug)]
pub struct Page {
    pub(crate) id: PageId,
    pub(crate) kind: PageKind,
    pub(crate) index: u32,
    pub(crate) identifier: String,
    pub(crate) url: String,
    pub(crate) output: PathBuf,
    pub(crate) template: String,
    pub(crate) parent: Option<PageId>,
    pub(crate) children: Vec<PageId>,
    pub(crate) assets: Vec<Asset>,
    pub(crate) fields: Map<String, Value>,
}

impl Page {
    /// Handle of this page.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Directory or virtual.
    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    /// Content file for directory pages.
    pub fn source(&self) -> Option<&Path> {
        match &self.kind {
            PageKind::Directory { source } => Some(source),
            PageKind::Virtual => None,
        }
    }

    /// True for pages added at runtime.
    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, PageKind::Virtual)
    }

    /// Ordering index (directory name prefix or virtual page property).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// True when the index is positive.
    pub fn visible(&self) -> bool {
        self.index > 0
    }

    /// Negation of [`visible`](Self::visible).
    pub fn invisible(&self) -> bool {
        !self.visible()
    }

    /// Identifier relative to the content root (`""` for the root page).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Public URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Destination file in the output tree.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Template name (content file stem).
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parent handle, `None` for the root.
    pub fn parent(&self) -> Option<PageId> {
        self.parent
    }

    /// Child handles in order.
    pub fn children(&self) -> &[PageId] {
        &self.children
    }

    /// True if the page has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Every asset, grouped by category in discovery order.
    pub fn files(&self) -> &[Asset] {
        &self.assets
    }

    /// True if the page owns any asset.
    pub fn has_files(&self) -> bool {
        !self.assets.is_empty()
    }

    /// Assets of one category.
    pub fn assets(&self, category: AssetCategory) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(move |asset| asset.category == category)
    }

    /// True if the page owns an asset of `category`.
    pub fn has_assets(&self, category: AssetCategory) -> bool {
        self.assets(category).next().is_some()
    }

    /// Image assets.
    pub fn images(&self) -> impl Iterator<Item = &Asset> {
        self.assets(AssetCategory::Images)
    }

    /// Open field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// True if the field map holds `key`.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field value for `key`, or `fallback`.
    ///
    /// Only the field map is consulted: `get("url", ..)` does not return the
    /// structural URL.
    pub fn get(&self, key: &str, fallback: impl Into<Value>) -> Value {
        self.fields
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.into())
    }
}
