//! Depth-first rendering of a page tree.
//!
//! For each page: resolve its template, compute locals, write the output
//! file, copy its assets, then render its children. Asset copies of one page
//! and sibling subtrees run on the rayon thread pool. The first failure
//! aborts the walk; files already written stay in place. Template values for
//! all pages are prepared once up front and shared between pages.

use std::path::PathBuf;

use quire_site::natural;
use quire_site::{Page, PageId, PageTree, SiteOptions};
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::locals::SiteLocals;
use crate::output;
use crate::template::TemplateEngine;

/// Pages and assets written by a render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered pages.
    pub pages: usize,
    /// Copied assets.
    pub assets: usize,
}

impl BuildReport {
    fn merge(self, other: Self) -> Self {
        Self {
            pages: self.pages + other.pages,
            assets: self.assets + other.assets,
        }
    }
}

/// Renders a [`PageTree`] through a [`TemplateEngine`].
pub struct Renderer<'a> {
    engine: &'a dyn TemplateEngine,
    globals: &'a Map<String, Value>,
}

impl<'a> Renderer<'a> {
    /// Create a renderer. `globals` are merged into every page's locals.
    pub fn new(engine: &'a dyn TemplateEngine, globals: &'a Map<String, Value>) -> Self {
        Self { engine, globals }
    }

    /// Render every page of `tree`, starting at the root.
    pub fn render(&self, tree: &PageTree) -> Result<BuildReport, BuildError> {
        let locals = SiteLocals::new(tree, self.globals);
        self.render_page(tree, &locals, tree.root())
    }

    fn render_page(
        &self,
        tree: &PageTree,
        site: &SiteLocals<'_>,
        id: PageId,
    ) -> Result<BuildReport, BuildError> {
        let page = tree.page(id);
        let template = find_template(tree.options(), page)?;

        let locals = site.page(id);
        let rendered = self
            .engine
            .render(&template, &locals)
            .map_err(|source| BuildError::Template {
                template: template.clone(),
                source,
            })?;
        output::write_page(page.output(), &rendered)?;
        tracing::debug!(url = %page.url(), output = %page.output().display(), "Rendered page");

        page.files()
            .par_iter()
            .try_for_each(|asset| output::copy_asset(asset.source(), asset.output()))?;

        let own = BuildReport {
            pages: 1,
            assets: page.files().len(),
        };

        let children = page
            .children()
            .par_iter()
            .map(|&child| self.render_page(tree, site, child))
            .try_reduce(BuildReport::default, |a, b| Ok(a.merge(b)))?;

        Ok(own.merge(children))
    }
}

/// Template file for `page`: the first `<template>.<ext>` in the templates
/// directory, in natural order.
pub fn find_template(options: &SiteOptions, page: &Page) -> Result<PathBuf, BuildError> {
    let mut candidates: Vec<PathBuf> = options
        .extensions
        .templates
        .iter()
        .map(|ext| {
            options
                .paths
                .templates
                .join(format!("{}.{ext}", page.template()))
        })
        .filter(|path| path.is_file())
        .collect();
    natural::sort_by_file_name(&mut candidates);

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| BuildError::MissingTemplate {
            template: page.template().to_owned(),
            page: page.url().to_owned(),
        })
}
