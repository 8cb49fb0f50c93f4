//! `quire build` command implementation.

use std::time::Instant;

use clap::Args;
use quire_render::Builder;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, discovery or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Content: {}",
            config.paths_resolved.content.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.paths_resolved.output.display()
        ));

        let start = Instant::now();
        let report = Builder::new(config).build()?;

        output.success(&format!(
            "Built {} pages and copied {} assets in {:.2?}",
            report.pages,
            report.assets,
            start.elapsed()
        ));
        Ok(())
    }
}
