//! Page tree discovery and navigation.
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>` with parent/children relationships
//! tracked by [`PageId`] handles. The root page (genesis) is always the first
//! entry. Genesis of any other page is resolved by walking parent handles, so
//! nodes never hold references to each other.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::asset::{Asset, AssetCategory};
use crate::error::SiteError;
use crate::item;
use crate::naming;
use crate::options::SiteOptions;
use crate::page::{Page, PageId, PageKind};
use crate::scanner;

/// A discovered site: every page plus the options it was built with.
#[derive(Clone, Debug)]
pub struct PageTree {
    pub(crate) pages: Vec<Page>,
    pub(crate) options: SiteOptions,
}

impl PageTree {
    /// Discover the page tree under `options.paths.content`.
    ///
    /// Returns `Ok(None)` if the content root holds no content file.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::AssetDecode` if an image header cannot be read,
    /// or `SiteError::Pattern` if a directory cannot be listed.
    pub fn from_directory(options: SiteOptions) -> Result<Option<Self>, SiteError> {
        let root = options.paths.content.clone();
        let Some(source) = scanner::content_file(&root, &options.extensions)? else {
            tracing::debug!(path = %root.display(), "No content file at content root");
            return Ok(None);
        };

        let mut tree = Self {
            pages: Vec::new(),
            options,
        };
        tree.build_page(&root, source, None)?;

        tracing::debug!(pages = tree.pages.len(), "Page tree built");
        Ok(Some(tree))
    }

    fn build_page(
        &mut self,
        dir: &Path,
        source: PathBuf,
        parent: Option<PageId>,
    ) -> Result<PageId, SiteError> {
        let relative = dir
            .strip_prefix(&self.options.paths.content)
            .unwrap_or(Path::new(""));
        let dir_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let identifier = naming::identifier_for(relative);
        let template = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let fields = item::read_record(Some(&source), &self.options.separators)
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let id = PageId(self.pages.len());
        self.pages.push(Page {
            id,
            kind: PageKind::Directory { source },
            index: naming::parse_index(&dir_name),
            url: self.options.page_url(&identifier),
            output: self.options.page_output(&identifier),
            identifier,
            template,
            parent,
            children: Vec::new(),
            assets: Vec::new(),
            fields,
        });

        for child_dir in scanner::child_directories(dir)? {
            match scanner::content_file(&child_dir, &self.options.extensions)? {
                Some(child_source) => {
                    let child = self.build_page(&child_dir, child_source, Some(id))?;
                    self.pages[id.0].children.push(child);
                }
                None => {
                    tracing::warn!(path = %child_dir.display(), "Skipping directory without content file");
                }
            }
        }

        let assets = self.discover_assets(dir, id)?;
        self.pages[id.0].assets = assets;

        Ok(id)
    }

    fn discover_assets(&self, dir: &Path, id: PageId) -> Result<Vec<Asset>, SiteError> {
        let identifier = &self.pages[id.0].identifier;
        let mut assets = Vec::new();

        for category in AssetCategory::ALL {
            for file in scanner::asset_files(dir, category, &self.options.extensions)? {
                let sidecar = scanner::sidecar(&file, &self.options.extensions);
                assets.push(Asset::new(
                    file,
                    sidecar,
                    identifier,
                    category,
                    &self.options,
                )?);
            }
        }

        Ok(assets)
    }

    /// Handle of the root page.
    #[must_use]
    pub fn root(&self) -> PageId {
        PageId(0)
    }

    /// Root of the tree containing `id`, found by walking parent handles.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn genesis(&self, id: PageId) -> PageId {
        let mut current = id;
        while let Some(parent) = self.pages[current.0].parent {
            current = parent;
        }
        current
    }

    /// Page for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    /// Navigable view of the page for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn page_ref(&self, id: PageId) -> PageRef<'_> {
        PageRef {
            tree: self,
            page: self.page(id),
        }
    }

    /// Number of pages, virtual pages included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Children of `id` in order.
    pub fn children(&self, id: PageId) -> impl Iterator<Item = &Page> {
        self.page(id)
            .children
            .iter()
            .map(|&child| self.page(child))
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: PageId) -> Option<&Page> {
        self.page(id).parent.map(|parent| self.page(parent))
    }

    /// `id` and every page below it, depth-first in child order.
    #[must_use]
    pub fn descendants(&self, id: PageId) -> Vec<PageId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.page(current).children.iter().rev());
        }
        result
    }

    /// Options the tree was built with.
    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Prefix `url` with the site base unless it already carries it.
    #[must_use]
    pub fn basepath(&self, url: &str) -> String {
        self.options.basepath(url)
    }

    /// Find the page whose URL matches `url` below `start` (default: root).
    ///
    /// `url` is converted the way page URLs are built (base plus permalink),
    /// then matched exactly, depth-first with `start` itself first. The empty
    /// string converts to the bare base, which no page URL equals, so
    /// `find_page_by_url("", ..)` finds nothing while `"/"` finds the root.
    #[must_use]
    pub fn find_page_by_url(&self, url: &str, start: Option<PageId>) -> Option<PageId> {
        let converted = self.options.lookup_url(url);
        let start = start.unwrap_or_else(|| self.root());

        self.descendants(start)
            .into_iter()
            .find(|&id| self.page(id).url == converted)
    }

    /// [`find_page_by_url`](Self::find_page_by_url) with the URL `/`.
    #[must_use]
    pub fn find_page_by_url_default(&self, start: Option<PageId>) -> Option<PageId> {
        self.find_page_by_url("/", start)
    }
}

/// A page together with the tree it lives in.
#[derive(Clone, Copy, Debug)]
pub struct PageRef<'a> {
    tree: &'a PageTree,
    page: &'a Page,
}

impl<'a> PageRef<'a> {
    /// Parent page.
    #[must_use]
    pub fn parent(&self) -> Option<PageRef<'a>> {
        self.page.parent.map(|id| self.tree.page_ref(id))
    }

    /// Child pages in order.
    pub fn children(&self) -> impl Iterator<Item = PageRef<'a>> {
        let tree = self.tree;
        self.page.children.iter().map(move |&id| tree.page_ref(id))
    }

    /// Root of the tree.
    #[must_use]
    pub fn genesis(&self) -> PageRef<'a> {
        self.tree.page_ref(self.tree.genesis(self.page.id))
    }

    /// Search below this page.
    #[must_use]
    pub fn find_page_by_url(&self, url: &str) -> Option<PageRef<'a>> {
        self.tree
            .find_page_by_url(url, Some(self.page.id))
            .map(|id| self.tree.page_ref(id))
    }
}

impl Deref for PageRef<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use quire_config::Config;

    use super::*;
    use crate::asset::tests::GIF_1X1;

    fn options(root: &Path, base: &str) -> SiteOptions {
        let mut config = Config::default_with_base(root);
        config.base = base.to_owned();
        SiteOptions::from_config(&config)
    }

    fn write(path: PathBuf, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Root, three visible children (one nested), one invisible child and
    /// two images on `1-a`.
    fn demo_site(root: &Path) {
        let content = root.join("content");
        write(content.join("home.md"), b"Title: Home\n-----\nText: Welcome");
        write(content.join("1-a/default.md"), b"Title: A");
        write(content.join("1-a/1-a.gif"), GIF_1X1);
        write(content.join("1-a/1-a.gif.md"), b"Title: Spacer");
        write(content.join("1-a/b.gif"), GIF_1X1);
        write(content.join("2-b/default.md"), b"Title: B");
        write(content.join("2-b/1-a/default.md"), b"Title: B/A");
        write(content.join("c/default.md"), b"Title: Hidden");
        write(content.join("3-empty/notes.txt"), b"no content file");
    }

    fn demo_tree(root: &Path) -> PageTree {
        demo_site(root);
        PageTree::from_directory(options(root, "/demo"))
            .unwrap()
            .unwrap()
    }

    fn identifiers(tree: &PageTree, ids: impl IntoIterator<Item = PageId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| tree.page(id).identifier().to_owned())
            .collect()
    }

    #[test]
    fn test_no_content_file_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("content/1-a")).unwrap();
        fs::write(temp_dir.path().join("content/1-a/page.md"), "Title: A").unwrap();

        let tree = PageTree::from_directory(options(temp_dir.path(), "")).unwrap();

        assert!(tree.is_none());
    }

    #[test]
    fn test_missing_content_root_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();

        let tree = PageTree::from_directory(options(temp_dir.path(), "")).unwrap();

        assert!(tree.is_none());
    }

    #[test]
    fn test_root_is_its_own_genesis() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let root = tree.root();

        assert_eq!(tree.genesis(root), root);
        assert!(tree.page(root).parent().is_none());
        assert_eq!(tree.page(root).identifier(), "");
        assert_eq!(tree.page(root).url(), "/demo/");
        assert_eq!(tree.page(root).template(), "home");
        assert_eq!(
            tree.page(root).output(),
            temp_dir.path().join("output/index.html").as_path()
        );
        assert_eq!(tree.page(root).get("title", ""), Value::from("Home"));
    }

    #[test]
    fn test_children_structure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let root = tree.root();

        let children: Vec<&str> = tree.children(root).map(Page::identifier).collect();
        assert_eq!(children, vec!["a", "b", "c"]);
        assert_eq!(tree.len(), 5);

        let b = tree.page(root).children()[1];
        let nested = tree.page(b).children()[0];
        assert_eq!(tree.page(nested).identifier(), "b/a");
        assert_eq!(tree.page(nested).url(), "/demo/b/a");
        assert_eq!(tree.genesis(nested), root);
        assert_eq!(tree.parent(nested).unwrap().identifier(), "b");
    }

    #[test]
    fn test_natural_order_of_children() {
        let temp_dir = tempfile::tempdir().unwrap();
        let content = temp_dir.path().join("content");
        write(content.join("index.md"), b"");
        for dir in ["2-x", "10-y", "1-z"] {
            write(content.join(dir).join("page.md"), b"");
        }

        let tree = PageTree::from_directory(options(temp_dir.path(), ""))
            .unwrap()
            .unwrap();

        let children: Vec<&str> = tree.children(tree.root()).map(Page::identifier).collect();
        assert_eq!(children, vec!["z", "x", "y"]);
        let indices: Vec<u32> = tree.children(tree.root()).map(Page::index).collect();
        assert_eq!(indices, vec![1, 2, 10]);
    }

    #[test]
    fn test_index_and_visibility() {
        let temp_dir = tempfile::tempdir().unwrap();
        demo_site(temp_dir.path());
        write(
            temp_dir.path().join("content/0-draft/default.md"),
            b"Title: Draft",
        );
        let tree = PageTree::from_directory(options(temp_dir.path(), "/demo"))
            .unwrap()
            .unwrap();

        let visibility: Vec<(&str, u32, bool, bool)> = tree
            .children(tree.root())
            .map(|page| (page.identifier(), page.index(), page.visible(), page.invisible()))
            .collect();

        assert_eq!(
            visibility,
            vec![
                ("draft", 0, false, true),
                ("a", 1, true, false),
                ("b", 2, true, false),
                ("c", 0, false, true),
            ]
        );
    }

    #[test]
    fn test_directory_without_content_file_warns() {
        let temp_dir = tempfile::tempdir().unwrap();
        demo_site(temp_dir.path());
        let logs = crate::tests::CapturedLogs::default();

        let tree = tracing::subscriber::with_default(logs.subscriber(), || {
            PageTree::from_directory(options(temp_dir.path(), "/demo"))
        })
        .unwrap()
        .unwrap();

        assert_eq!(tree.len(), 5);
        let logs = logs.contents();
        let line = logs
            .lines()
            .find(|line| line.contains("Skipping directory without content file"))
            .unwrap_or_else(|| panic!("no skip warning in {logs}"));
        assert!(line.contains("WARN"), "{line}");
        assert!(line.contains("3-empty"), "{line}");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_followed() {
        let temp_dir = tempfile::tempdir().unwrap();
        demo_site(temp_dir.path());
        let content = temp_dir.path().join("content");
        std::os::unix::fs::symlink(&content, content.join("2-b/4-loop")).unwrap();

        let tree = PageTree::from_directory(options(temp_dir.path(), "/demo"))
            .unwrap()
            .unwrap();

        assert_eq!(tree.len(), 5);
        assert!(tree.find_page_by_url("/b/loop", None).is_none());
    }

    #[test]
    fn test_assets_discovered_with_sidecar() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let a = tree.page(tree.page(tree.root()).children()[0]);

        let images: Vec<&Asset> = a.images().collect();
        assert_eq!(images.len(), 2);
        assert!(a.has_files());
        assert!(a.has_assets(AssetCategory::Images));
        assert!(!a.has_assets(AssetCategory::Videos));

        assert_eq!(images[0].url(), "/demo/a/a.gif");
        assert_eq!(images[0].index(), 1);
        assert_eq!(images[0].get("title", ""), Value::from("Spacer"));
        assert_eq!(images[0].dimensions(), Some((1, 1)));

        assert_eq!(images[1].url(), "/demo/a/b.gif");
        assert_eq!(images[1].index(), 0);
        assert!(images[1].sidecar().is_none());

        // The image sidecar is not mistaken for the page's content file
        assert_eq!(a.template(), "default");
    }

    #[test]
    fn test_undecodable_image_aborts_discovery() {
        let temp_dir = tempfile::tempdir().unwrap();
        let content = temp_dir.path().join("content");
        write(content.join("home.md"), b"");
        write(content.join("1-a/page.md"), b"");
        write(content.join("1-a/broken.png"), b"not a png");

        let err = PageTree::from_directory(options(temp_dir.path(), "")).unwrap_err();

        assert!(matches!(err, SiteError::AssetDecode { .. }));
    }

    #[test]
    fn test_find_page_by_url_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());

        for id in tree.descendants(tree.root()) {
            let identifier = tree.page(id).identifier();
            let relative = format!("/{identifier}");
            assert_eq!(
                tree.find_page_by_url(&relative, None),
                Some(id),
                "lookup of {relative:?}"
            );
        }
    }

    #[test]
    fn test_find_page_by_url_misses() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());

        assert_eq!(tree.find_page_by_url("/nope", None), None);
        assert_eq!(tree.find_page_by_url("/demo/a", None), None);
    }

    #[test]
    fn test_find_page_by_url_empty_versus_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());

        assert_eq!(tree.find_page_by_url("", None), None);
        assert_eq!(tree.find_page_by_url_default(None), Some(tree.root()));
    }

    #[test]
    fn test_find_page_by_url_from_subtree() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let b = tree.page(tree.root()).children()[1];

        assert!(tree.find_page_by_url("/b/a", Some(b)).is_some());
        assert_eq!(tree.find_page_by_url("/a", Some(b)), None);
        // The default URL only matches the root, which is outside the subtree
        assert_eq!(tree.find_page_by_url_default(Some(b)), None);
    }

    #[test]
    fn test_find_page_by_url_with_trailing_slash_permalink() {
        let temp_dir = tempfile::tempdir().unwrap();
        demo_site(temp_dir.path());
        let options = options(temp_dir.path(), "")
            .with_permalink(crate::options::Permalink::trailing_slash());

        let tree = PageTree::from_directory(options).unwrap().unwrap();

        let found = tree.find_page_by_url("/b/a", None).unwrap();
        assert_eq!(tree.page(found).url(), "/b/a/");
    }

    #[test]
    fn test_descendants_preorder() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());

        assert_eq!(
            identifiers(&tree, tree.descendants(tree.root())),
            vec!["", "a", "b", "b/a", "c"]
        );
    }

    #[test]
    fn test_basepath() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());

        assert_eq!(tree.basepath(""), "/demo");
        assert_eq!(tree.basepath("/img/x.png"), "/demo/img/x.png");
        assert_eq!(tree.basepath("/demo/img/x.png"), "/demo/img/x.png");
    }

    #[test]
    fn test_has_and_get_use_field_map_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let root = tree.page(tree.root());

        assert!(root.has("title"));
        assert!(root.has("text"));
        assert!(!root.has("url"));
        assert_eq!(root.get("url", "fallback"), Value::from("fallback"));
    }

    #[test]
    fn test_page_ref_navigation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = demo_tree(temp_dir.path());
        let root = tree.page_ref(tree.root());

        let b = root.children().nth(1).unwrap();
        let nested = b.find_page_by_url("/b/a").unwrap();

        assert_eq!(nested.parent().unwrap().identifier(), "b");
        assert_eq!(nested.genesis().id(), tree.root());
        assert!(b.has_children());
    }
}
