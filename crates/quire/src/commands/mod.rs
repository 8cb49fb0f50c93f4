//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod tree;

use std::path::PathBuf;

use clap::Args;
use quire_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use tree::TreeArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long, env = "QUIRE_CONTENT")]
    content: Option<PathBuf>,

    /// Templates directory (overrides config).
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// URL prefix without trailing slash (overrides config).
    #[arg(long)]
    base: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load the configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content.clone(),
            templates_dir: self.templates.clone(),
            output_dir: self.output.clone(),
            base: self.base.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config = ?config.config_path,
            content = %config.paths_resolved.content.display(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
