//! Template locals.
//!
//! Locals are the page view with the configured globals deep-merged on top:
//! tables merge key by key, arrays are concatenated and any other value is
//! replaced.
//!
//! [`SiteLocals`] converts every page to a template value once. Child lists,
//! parent views and the genesis subtree are shared between pages rather than
//! copied into each page's locals.

use std::collections::BTreeMap;

use minijinja::Value;
use quire_site::view;
use quire_site::{PageId, PageTree};
use serde_json::{Map, Value as Json};

/// Deep-merge `source` into `target`.
pub fn deep_merge(target: &mut Json, source: &Json) {
    match (target, source) {
        (Json::Object(target), Json::Object(source)) => merge_map(target, source),
        (Json::Array(target), Json::Array(source)) => target.extend(source.iter().cloned()),
        (target, source) => *target = source.clone(),
    }
}

fn merge_map(target: &mut Map<String, Json>, source: &Map<String, Json>) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

type Entries = BTreeMap<String, Value>;

/// Template values for every page of a tree.
pub struct SiteLocals<'a> {
    tree: &'a PageTree,
    globals: &'a Map<String, Json>,
    /// Converted [`view::page_fields`] per page, indexed by [`PageId`].
    fields: Vec<Entries>,
    /// `page_fields` as a map value, used for `parent`.
    shallow: Vec<Value>,
    /// Child node values per page.
    children: Vec<Value>,
    /// Page fields plus `children`, recursively.
    nodes: Vec<Value>,
}

impl<'a> SiteLocals<'a> {
    /// Convert every page of `tree`.
    #[must_use]
    pub fn new(tree: &'a PageTree, globals: &'a Map<String, Json>) -> Self {
        let fields: Vec<Entries> = tree
            .iter()
            .map(|page| {
                view::page_fields(page)
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_serialize(&value)))
                    .collect()
            })
            .collect();
        let shallow = fields
            .iter()
            .map(|entries| Value::from_iter(entries.clone()))
            .collect();

        let mut children = vec![Value::UNDEFINED; tree.len()];
        let mut nodes = vec![Value::UNDEFINED; tree.len()];
        // Reversed preorder reaches children before their parent
        for id in tree.descendants(tree.root()).into_iter().rev() {
            let index = id.index();
            let list: Value = tree
                .page(id)
                .children()
                .iter()
                .map(|child| nodes[child.index()].clone())
                .collect();
            let mut node = fields[index].clone();
            node.insert("children".to_owned(), list.clone());
            nodes[index] = Value::from_iter(node);
            children[index] = list;
        }

        Self {
            tree,
            globals,
            fields,
            shallow,
            children,
            nodes,
        }
    }

    /// Locals for one page.
    ///
    /// A global named `children`, `parent` or `genesis` is merged into a
    /// copy of that link's JSON view.
    #[must_use]
    pub fn page(&self, id: PageId) -> Value {
        let index = id.index();
        let mut entries = self.fields[index].clone();
        entries.insert("children".to_owned(), self.children[index].clone());
        entries.insert(
            "parent".to_owned(),
            self.tree
                .page(id)
                .parent()
                .map_or(Value::from(()), |parent| self.shallow[parent.index()].clone()),
        );
        entries.insert(
            "genesis".to_owned(),
            self.nodes[self.tree.genesis(id).index()].clone(),
        );

        if !self.globals.is_empty() {
            let mut json = self.json_view(id);
            for (key, global) in self.globals {
                let merged = match json.get_mut(key) {
                    Some(existing) => {
                        deep_merge(existing, global);
                        &*existing
                    }
                    None => global,
                };
                entries.insert(key.clone(), Value::from_serialize(merged));
            }
        }

        Value::from_iter(entries)
    }

    /// JSON view of the page with each link materialised only when a global
    /// of the same name needs merging into it.
    fn json_view(&self, id: PageId) -> Map<String, Json> {
        let page = self.tree.page(id);
        let mut json = view::page_fields(page);
        if self.globals.contains_key("children") {
            let children = page
                .children()
                .iter()
                .map(|&child| view::node_view(self.tree, child))
                .collect();
            json.insert("children".to_owned(), Json::Array(children));
        }
        if self.globals.contains_key("parent") {
            let parent = self
                .tree
                .parent(id)
                .map_or(Json::Null, |parent| Json::Object(view::page_fields(parent)));
            json.insert("parent".to_owned(), parent);
        }
        if self.globals.contains_key("genesis") {
            json.insert(
                "genesis".to_owned(),
                view::node_view(self.tree, self.tree.genesis(id)),
            );
        }
        json
    }
}
