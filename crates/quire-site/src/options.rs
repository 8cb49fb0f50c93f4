//! Runtime options for building a page tree.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quire_config::{Config, ExtensionsConfig, PathsConfig, PermalinkStyle, SeparatorsConfig};

use crate::naming;

/// Transform applied to page identifiers when building URLs.
///
/// The same transform is applied to lookup URLs in
/// [`PageTree::find_page_by_url`](crate::PageTree::find_page_by_url), so
/// custom transforms must map a leading-slash form consistently.
#[derive(Clone)]
pub struct Permalink(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Permalink {
    /// Create a permalink transform from a closure.
    pub fn new(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(transform))
    }

    /// Identity transform.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(|path| path.to_owned())
    }

    /// Append a trailing slash unless one is present.
    #[must_use]
    pub fn trailing_slash() -> Self {
        Self::new(|path| {
            if path.ends_with('/') {
                path.to_owned()
            } else {
                format!("{path}/")
            }
        })
    }

    /// Apply the transform.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        (self.0)(path)
    }
}

impl Default for Permalink {
    fn default() -> Self {
        Self::plain()
    }
}

impl From<PermalinkStyle> for Permalink {
    fn from(style: PermalinkStyle) -> Self {
        match style {
            PermalinkStyle::Plain => Self::plain(),
            PermalinkStyle::TrailingSlash => Self::trailing_slash(),
        }
    }
}

impl fmt::Debug for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Permalink(..)")
    }
}

/// Options shared by every node of a [`PageTree`](crate::PageTree).
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// URL prefix (no trailing slash).
    pub base: String,
    /// Content, template and output directories.
    pub paths: PathsConfig,
    /// Content record separators.
    pub separators: SeparatorsConfig,
    /// Recognised file extensions.
    pub extensions: ExtensionsConfig,
    /// Identifier-to-URL transform.
    pub permalink: Permalink,
}

impl SiteOptions {
    /// Build options from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: config.base.clone(),
            paths: config.paths_resolved.clone(),
            separators: config.separators.clone(),
            extensions: config.extensions_resolved.clone(),
            permalink: config.permalink.into(),
        }
    }

    /// Replace the permalink transform.
    #[must_use]
    pub fn with_permalink(mut self, permalink: Permalink) -> Self {
        self.permalink = permalink;
        self
    }

    /// URL of a page: `base/` at the root, `base/permalink(identifier)` elsewhere.
    #[must_use]
    pub fn page_url(&self, identifier: &str) -> String {
        if identifier.is_empty() {
            format!("{}/", self.base)
        } else {
            format!("{}/{}", self.base, self.permalink.apply(identifier))
        }
    }

    /// Output file of a page: `output/identifier/index.<ext>`.
    #[must_use]
    pub fn page_output(&self, identifier: &str) -> PathBuf {
        let file = format!("index.{}", self.extensions.output);
        if identifier.is_empty() {
            self.paths.output.join(file)
        } else {
            self.paths.output.join(identifier).join(file)
        }
    }

    /// URL of an asset. Assets bypass the permalink transform.
    #[must_use]
    pub fn asset_url(&self, identifier: &str) -> String {
        format!("{}/{identifier}", self.base)
    }

    /// Output file of an asset.
    #[must_use]
    pub fn asset_output(&self, identifier: &str) -> PathBuf {
        self.paths.output.join(identifier)
    }

    /// Convert a lookup URL the way node URLs are built.
    ///
    /// The empty string maps to the bare base (which no page URL equals),
    /// anything else to `base + permalink(url)`.
    #[must_use]
    pub fn lookup_url(&self, url: &str) -> String {
        if url.is_empty() {
            self.base.clone()
        } else {
            format!("{}{}", self.base, self.permalink.apply(url))
        }
    }

    /// Prefix `url` with the base unless it already carries it.
    #[must_use]
    pub fn basepath(&self, url: &str) -> String {
        naming::basepath(&self.base, url)
    }
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
