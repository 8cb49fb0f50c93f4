//! Media and document assets attached to a page.
//!
//! Assets are the files found next to a page's content file whose extension
//! belongs to one of the asset categories. An asset may carry a sidecar
//! content file named after it (`photo.jpg.md`) whose record is stored in the
//! asset's field map.

use std::path::{Path, PathBuf};

use quire_config::ExtensionsConfig;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SiteError;
use crate::item;
use crate::naming;
use crate::options::SiteOptions;

/// Asset category, in discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// Images (dimensions are probed).
    Images,
    /// Videos.
    Videos,
    /// Sounds.
    Sounds,
    /// Documents.
    Documents,
}

impl AssetCategory {
    /// All categories in discovery order.
    pub const ALL: [Self; 4] = [Self::Images, Self::Videos, Self::Sounds, Self::Documents];

    /// Lowercase plural name (`images`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Sounds => "sounds",
            Self::Documents => "documents",
        }
    }

    /// Name of the presence flag in template views (`hasImages`).
    #[must_use]
    pub fn flag_name(self) -> &'static str {
        match self {
            Self::Images => "hasImages",
            Self::Videos => "hasVideos",
            Self::Sounds => "hasSounds",
            Self::Documents => "hasDocuments",
        }
    }

    /// Configured extensions for this category.
    #[must_use]
    pub fn extensions(self, extensions: &ExtensionsConfig) -> &[String] {
        match self {
            Self::Images => &extensions.images,
            Self::Videos => &extensions.videos,
            Self::Sounds => &extensions.sounds,
            Self::Documents => &extensions.documents,
        }
    }
}

/// Variant-specific asset data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// Plain file.
    File,
    /// Image with pixel dimensions read from its header.
    Image {
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
    },
}

/// A file asset owned by a page.
#[derive(Clone, Debug)]
pub struct Asset {
    pub(crate) kind: AssetKind,
    pub(crate) category: AssetCategory,
    pub(crate) source: PathBuf,
    pub(crate) sidecar: Option<PathBuf>,
    pub(crate) index: u32,
    pub(crate) identifier: String,
    pub(crate) url: String,
    pub(crate) output: PathBuf,
    pub(crate) fields: Map<String, Value>,
}

impl Asset {
    /// Build an asset for `source`, owned by the page with `page_identifier`.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::AssetDecode` if the category is images and the
    /// file header cannot be decoded.
    pub(crate) fn new(
        source: PathBuf,
        sidecar: Option<PathBuf>,
        page_identifier: &str,
        category: AssetCategory,
        options: &SiteOptions,
    ) -> Result<Self, SiteError> {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let index = naming::parse_index(&file_name);
        let identifier =
            naming::join_identifier(page_identifier, naming::strip_index(&file_name));

        let kind = match category {
            AssetCategory::Images => probe_image(&source)?,
            _ => AssetKind::File,
        };

        let fields = item::read_record(sidecar.as_deref(), &options.separators)
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        Ok(Self {
            kind,
            category,
            url: options.asset_url(&identifier),
            output: options.asset_output(&identifier),
            source,
            sidecar,
            index,
            identifier,
            fields,
        })
    }

    /// Variant data.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Category the asset was discovered under.
    pub fn category(&self) -> AssetCategory {
        self.category
    }

    /// Source file path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Sidecar content file, if one exists.
    pub fn sidecar(&self) -> Option<&Path> {
        self.sidecar.as_deref()
    }

    /// Ordering index from the file name prefix.
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

    /// Identifier relative to the content root, prefixes stripped.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Public URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Destination path in the output tree.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Pixel dimensions for images.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self.kind {
            AssetKind::Image { width, height } => Some((width, height)),
            AssetKind::File => None,
        }
    }

    /// Fields parsed from the sidecar content file.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// True if the sidecar defines `key`.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Sidecar value for `key`, or `fallback`.
    pub fn get(&self, key: &str, fallback: impl Into<Value>) -> Value {
        self.fields
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.into())
    }
}

fn probe_image(path: &Path) -> Result<AssetKind, SiteError> {
    let size = imagesize::size(path).map_err(|e| SiteError::AssetDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(AssetKind::Image {
        width: size.width,
        height: size.height,
    })
}
