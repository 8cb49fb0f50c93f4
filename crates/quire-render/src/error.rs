//! Error types for site builds.

use std::path::PathBuf;

use quire_site::SiteError;

use crate::template::TemplateError;

/// Error returned when building or rendering a site fails.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The content root holds no content file.
    #[error("Missing genesis page: no content file in {}", .0.display())]
    MissingGenesis(PathBuf),
    /// No template file matches a page's template name.
    #[error("Missing template: {template} (page {page:?})")]
    MissingTemplate {
        /// Template name looked up.
        template: String,
        /// URL of the page that needed it.
        page: String,
    },
    /// Page tree discovery failed.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// The template engine failed.
    #[error("Failed to render {}: {source}", .template.display())]
    Template {
        /// Template file.
        template: PathBuf,
        /// Engine error.
        #[source]
        source: TemplateError,
    },
    /// Writing a page or copying an asset failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Removing previous output failed.
    #[error("Failed to clear {}: {source}", .path.display())]
    Clear {
        /// Output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
