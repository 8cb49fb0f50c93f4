//! Configuration management for Quire.
//!
//! Parses `quire.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Values from the file are deep-merged onto the built-in defaults:
//! scalars replace the default, extension lists are appended to the default
//! list, and tables (`globals`, `shortcodes`) merge key by key.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `base`
//! - `paths.content`
//! - `paths.templates`
//! - `paths.output`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override templates directory.
    pub templates_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override base URL prefix.
    pub base: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL prefix prepended to every page and asset URL (e.g. `/blog`).
    pub base: String,
    /// Transform applied to page identifiers when building URLs.
    pub permalink: PermalinkStyle,
    /// Directory configuration (paths are relative strings from TOML).
    paths: PathsConfigRaw,
    /// Content record separators.
    pub separators: SeparatorsConfig,
    /// Extension lists as written in TOML (merged onto defaults on load).
    extensions: ExtensionsConfigRaw,
    /// Values exposed to every template.
    pub globals: serde_json::Map<String, serde_json::Value>,
    /// Shortcode templates keyed by shortcode name.
    pub shortcodes: BTreeMap<String, String>,

    /// Resolved directory configuration (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Resolved extension lists (set after loading).
    #[serde(skip)]
    pub extensions_resolved: ExtensionsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// How page identifiers are turned into URL paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermalinkStyle {
    /// Identifier is used unchanged (`about/team`).
    #[default]
    Plain,
    /// A trailing slash is appended (`about/team/`).
    TrailingSlash,
}

/// Raw directory configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    content: Option<String>,
    templates: Option<String>,
    output: Option<String>,
}

/// Resolved directory configuration with absolute paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathsConfig {
    /// Root of the content tree.
    pub content: PathBuf,
    /// Directory holding template files.
    pub templates: PathBuf,
    /// Directory the site is written to (cleared on build).
    pub output: PathBuf,
}

impl PathsConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            content: base.join("content"),
            templates: base.join("templates"),
            output: base.join("output"),
        }
    }
}

/// Separators used by the content record format.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeparatorsConfig {
    /// Separator between records.
    pub line: String,
    /// Separator between a record's key and value.
    pub values: String,
}

impl Default for SeparatorsConfig {
    fn default() -> Self {
        Self {
            line: "-----".to_owned(),
            values: ":".to_owned(),
        }
    }
}

/// Raw extension configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ExtensionsConfigRaw {
    content: Option<Vec<String>>,
    templates: Option<Vec<String>>,
    images: Option<Vec<String>>,
    videos: Option<Vec<String>>,
    sounds: Option<Vec<String>>,
    documents: Option<Vec<String>>,
    output: Option<String>,
}

/// Resolved extension lists (defaults plus user additions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionsConfig {
    /// Content file extensions.
    pub content: Vec<String>,
    /// Template file extensions.
    pub templates: Vec<String>,
    /// Image asset extensions.
    pub images: Vec<String>,
    /// Video asset extensions.
    pub videos: Vec<String>,
    /// Sound asset extensions.
    pub sounds: Vec<String>,
    /// Document asset extensions.
    pub documents: Vec<String>,
    /// Extension of rendered page files.
    pub output: String,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            content: owned(&["md"]),
            templates: owned(&["tpl"]),
            images: owned(&["jpg", "jpeg", "gif", "png", "webp"]),
            videos: owned(&["mpg", "mpeg", "mp4", "mov", "avi", "flv", "ogv", "webm"]),
            sounds: owned(&["mp3", "wav", "m4a", "ogg", "oga"]),
            documents: owned(&["pdf", "doc", "xls", "ppt", "docx", "xlsx", "pptx"]),
            output: "html".to_owned(),
        }
    }
}

impl ExtensionsConfig {
    /// All asset extensions across every category.
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .chain(&self.videos)
            .chain(&self.sounds)
            .chain(&self.documents)
            .map(String::as_str)
    }

    fn merged(raw: &ExtensionsConfigRaw) -> Self {
        let defaults = Self::default();
        Self {
            content: merge_list(defaults.content, raw.content.as_deref()),
            templates: merge_list(defaults.templates, raw.templates.as_deref()),
            images: merge_list(defaults.images, raw.images.as_deref()),
            videos: merge_list(defaults.videos, raw.videos.as_deref()),
            sounds: merge_list(defaults.sounds, raw.sounds.as_deref()),
            documents: merge_list(defaults.documents, raw.documents.as_deref()),
            output: raw.output.clone().unwrap_or(defaults.output),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|&s| s.to_owned()).collect()
}

/// Append user entries to a default list, skipping duplicates.
fn merge_list(mut defaults: Vec<String>, extra: Option<&[String]>) -> Vec<String> {
    for item in extra.into_iter().flatten() {
        if !defaults.contains(item) {
            defaults.push(item.clone());
        }
    }
    defaults
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`paths.output`").
        field: String,
        /// Error message (e.g., "${`SITE_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a list field to have at least one entry.
fn require_non_empty_list(values: &[String], field: &str) -> Result<(), ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must list at least one extension"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quire.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// Relative paths are resolved against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion or validation fails.
    pub fn from_toml_str(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.resolve(config_dir);
        config.validate()?;

        Ok(config)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            base: String::new(),
            permalink: PermalinkStyle::default(),
            paths: PathsConfigRaw::default(),
            separators: SeparatorsConfig::default(),
            extensions: ExtensionsConfigRaw::default(),
            globals: serde_json::Map::new(),
            shortcodes: BTreeMap::new(),
            paths_resolved: PathsConfig::with_base(base),
            extensions_resolved: ExtensionsConfig::default(),
            config_path: None,
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content) = &settings.content_dir {
            self.paths_resolved.content.clone_from(content);
        }
        if let Some(templates) = &settings.templates_dir {
            self.paths_resolved.templates.clone_from(templates);
        }
        if let Some(output) = &settings.output_dir {
            self.paths_resolved.output.clone_from(output);
        }
        if let Some(base) = &settings.base {
            self.base.clone_from(base);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_base()?;
        self.validate_separators()?;
        self.validate_extensions()?;
        Ok(())
    }

    /// Validate the base URL prefix.
    fn validate_base(&self) -> Result<(), ConfigError> {
        // Page URLs are built as `{base}/{identifier}`
        if self.base.ends_with('/') {
            return Err(ConfigError::Validation(
                "base must not end with '/'".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate content record separators.
    fn validate_separators(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.separators.line, "separators.line")?;
        require_non_empty(&self.separators.values, "separators.values")?;

        if self.separators.line == self.separators.values {
            return Err(ConfigError::Validation(
                "separators.line and separators.values must differ".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate extension lists.
    fn validate_extensions(&self) -> Result<(), ConfigError> {
        let extensions = &self.extensions_resolved;
        require_non_empty_list(&extensions.content, "extensions.content")?;
        require_non_empty_list(&extensions.templates, "extensions.templates")?;
        require_non_empty(&extensions.output, "extensions.output")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.base = expand::expand_env(&self.base, "base")?;

        if let Some(ref content) = self.paths.content {
            self.paths.content = Some(expand::expand_path(content, "paths.content")?);
        }
        if let Some(ref templates) = self.paths.templates {
            self.paths.templates = Some(expand::expand_path(templates, "paths.templates")?);
        }
        if let Some(ref output) = self.paths.output {
            self.paths.output = Some(expand::expand_path(output, "paths.output")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and merge
    /// extension lists onto the defaults.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            content: resolve(self.paths.content.as_deref(), "content"),
            templates: resolve(self.paths.templates.as_deref(), "templates"),
            output: resolve(self.paths.output.as_deref(), "output"),
        };

        self.extensions_resolved = ExtensionsConfig::merged(&self.extensions);
    }
}
