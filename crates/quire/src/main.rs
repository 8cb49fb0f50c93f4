//! Quire CLI - Static site generator.
//!
//! Provides commands for:
//! - `build`: Render the content tree into the output directory
//! - `tree`: Print the discovered page tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, SiteArgs, TreeArgs};
use output::Output;

/// Quire - Static site generator.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site.
    Build(BuildArgs),
    /// Print the page tree.
    Tree(TreeArgs),
}

impl Commands {
    fn site(&self) -> &SiteArgs {
        match self {
            Self::Build(args) => &args.site,
            Self::Tree(args) => &args.site,
        }
    }
}

/// Log to stderr. `--verbose` forces `info`, otherwise `RUST_LOG` decides
/// (warnings only when unset).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    init_tracing(cli.command.site().verbose);

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
