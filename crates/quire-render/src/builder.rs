//! Site build facade.

use std::fmt;
use std::sync::Arc;

use quire_config::Config;
use quire_site::{PageTree, Permalink, SiteOptions};

use crate::error::BuildError;
use crate::output;
use crate::renderer::{BuildReport, Renderer};
use crate::shortcode::{ShortcodeAttrs, Shortcodes};
use crate::template::{MiniJinjaEngine, TemplateEngine};

/// Loads, renders and writes a site for one configuration.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use quire_config::Config;
/// use quire_render::Builder;
/// use quire_site::VirtualPageProps;
///
/// let config = Config::load(None, None)?;
/// let builder = Builder::new(config);
///
/// if let Some(mut tree) = builder.load()? {
///     let root = tree.root();
///     tree.add_virtual_page(root, VirtualPageProps::new("feed", "feed"));
///     builder.render(&tree)?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Builder {
    config: Config,
    options: SiteOptions,
    engine: Option<Box<dyn TemplateEngine>>,
    shortcodes: Shortcodes,
}

impl Builder {
    /// Create a builder using the default minijinja engine and the
    /// configuration's shortcode templates.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let options = SiteOptions::from_config(&config);
        let shortcodes = Shortcodes::from_templates(&config.shortcodes);
        Self {
            config,
            options,
            engine: None,
            shortcodes,
        }
    }

    /// Render with `engine` instead of the default one.
    #[must_use]
    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Replace the permalink transform.
    #[must_use]
    pub fn with_permalink(mut self, permalink: Permalink) -> Self {
        self.options = self.options.with_permalink(permalink);
        self
    }

    /// Register a shortcode handler for the default engine.
    #[must_use]
    pub fn with_shortcode(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&ShortcodeAttrs, Option<&str>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.shortcodes.register(name, handler);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Options pages are built with.
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// The minijinja engine this builder uses unless another one is set.
    ///
    /// Use it to register addon functions before passing it back through
    /// [`with_engine`](Self::with_engine).
    #[must_use]
    pub fn default_engine(&self) -> MiniJinjaEngine {
        MiniJinjaEngine::new(&self.options.paths.templates)
            .with_shortcodes(Arc::new(self.shortcodes.clone()))
            .with_basepath(self.options.base.clone())
    }

    /// Discover a fresh page tree. `Ok(None)` if there is no genesis page.
    pub fn load(&self) -> Result<Option<PageTree>, BuildError> {
        Ok(PageTree::from_directory(self.options.clone())?)
    }

    /// Render an existing tree into the output directory without clearing
    /// it first.
    pub fn render(&self, tree: &PageTree) -> Result<BuildReport, BuildError> {
        let default_engine;
        let engine: &dyn TemplateEngine = match &self.engine {
            Some(engine) => engine.as_ref(),
            None => {
                default_engine = self.default_engine();
                &default_engine
            }
        };

        Renderer::new(engine, &self.config.globals).render(tree)
    }

    /// Load the tree, clear the output directory and render.
    ///
    /// Nothing is removed when the content root has no genesis page.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let content = &self.options.paths.content;
        let tree = self
            .load()?
            .ok_or_else(|| BuildError::MissingGenesis(content.clone()))?;
        tracing::info!(pages = tree.len(), content = %content.display(), "Loaded page tree");

        output::clear_output(&self.options.paths.output)?;
        let report = self.render(&tree)?;

        tracing::info!(
            pages = report.pages,
            assets = report.assets,
            output = %self.options.paths.output.display(),
            "Site built"
        );
        Ok(report)
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("options", &self.options)
            .field("custom_engine", &self.engine.is_some())
            .field("shortcodes", &self.shortcodes)
            .finish_non_exhaustive()
    }
}
