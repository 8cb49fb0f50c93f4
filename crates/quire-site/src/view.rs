//! Template-facing JSON views of pages and assets.
//!
//! Views expose structural fields under camel-case names together with the
//! node's field map. For directory pages and assets the structural value wins
//! when a content key collides with a structural name; for virtual pages the
//! supplied properties win. Collisions only affect the view, never the node.

use serde_json::{Map, Value, json};

use crate::asset::{Asset, AssetCategory, AssetKind};
use crate::page::{Page, PageId};
use crate::tree::PageTree;

/// Full view of a page: its subtree, a shallow `parent` and the `genesis`
/// subtree.
///
/// Every call materialises the genesis subtree. Renderers working on a whole
/// tree should convert [`page_fields`] once per page and share the results.
#[must_use]
pub fn page_view(tree: &PageTree, id: PageId) -> Value {
    let mut view = node_map(tree, id);
    let parent = tree
        .parent(id)
        .map_or(Value::Null, |parent| Value::Object(page_fields(parent)));
    view.insert("parent".to_owned(), parent);
    view.insert("genesis".to_owned(), node_view(tree, tree.genesis(id)));
    Value::Object(view)
}

/// A page and its children, recursively. No `parent` or `genesis` keys.
#[must_use]
pub fn node_view(tree: &PageTree, id: PageId) -> Value {
    Value::Object(node_map(tree, id))
}

/// View of one asset.
#[must_use]
pub fn asset_view(asset: &Asset) -> Value {
    let mut view = asset.fields().clone();
    let structural = json!({
        "index": asset.index(),
        "visible": asset.visible(),
        "invisible": asset.invisible(),
        "identifier": asset.identifier(),
        "url": asset.url(),
        "output": asset.output().to_string_lossy(),
        "category": asset.category(),
    });
    overlay(&mut view, structural);

    if let AssetKind::Image { width, height } = asset.kind() {
        view.insert("width".to_owned(), Value::from(width));
        view.insert("height".to_owned(), Value::from(height));
    }

    Value::Object(view)
}

fn node_map(tree: &PageTree, id: PageId) -> Map<String, Value> {
    let page = tree.page(id);
    let mut view = page_fields(page);

    let children: Vec<Value> = page
        .children()
        .iter()
        .map(|&child| node_view(tree, child))
        .collect();
    view.insert("children".to_owned(), Value::Array(children));

    view
}

/// Structural fields, assets and field map of one page, without `children`,
/// `parent` or `genesis`.
#[must_use]
pub fn page_fields(page: &Page) -> Map<String, Value> {
    let mut structural = Map::new();
    structural.insert("index".to_owned(), page.index().into());
    structural.insert("visible".to_owned(), page.visible().into());
    structural.insert("invisible".to_owned(), page.invisible().into());
    structural.insert("identifier".to_owned(), page.identifier().into());
    structural.insert("url".to_owned(), page.url().into());
    structural.insert(
        "output".to_owned(),
        page.output().to_string_lossy().into_owned().into(),
    );
    structural.insert("template".to_owned(), page.template().into());
    structural.insert("hasChildren".to_owned(), page.has_children().into());

    structural.insert(
        "files".to_owned(),
        page.files().iter().map(asset_view).collect(),
    );
    structural.insert("hasFiles".to_owned(), page.has_files().into());
    for category in AssetCategory::ALL {
        structural.insert(
            category.name().to_owned(),
            page.assets(category).map(asset_view).collect(),
        );
        structural.insert(
            category.flag_name().to_owned(),
            page.has_assets(category).into(),
        );
    }

    if page.is_virtual() {
        let mut view = structural;
        view.extend(page.fields().clone());
        view
    } else {
        let mut view = page.fields().clone();
        view.extend(structural);
        view
    }
}

fn overlay(view: &mut Map<String, Value>, structural: Value) {
    if let Value::Object(structural) = structural {
        view.extend(structural);
    }
}
