//! `quire tree` command implementation.

use clap::Args;
use quire_render::BuildError;
use quire_site::{PageId, PageTree, SiteOptions};
use serde::Serialize;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,
}

/// Summary of one page for printing.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct TreeNode {
    identifier: String,
    url: String,
    template: String,
    visible: bool,
    assets: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn build(tree: &PageTree, id: PageId) -> Self {
        let page = tree.page(id);
        Self {
            identifier: page.identifier().to_owned(),
            url: page.url().to_owned(),
            template: page.template().to_owned(),
            visible: page.visible(),
            assets: page.files().len(),
            children: page
                .children()
                .iter()
                .map(|&child| Self::build(tree, child))
                .collect(),
        }
    }
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or discovery fails, or if the content
    /// root has no content file.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let content = config.paths_resolved.content.clone();

        let tree = PageTree::from_directory(SiteOptions::from_config(&config))?
            .ok_or(BuildError::MissingGenesis(content))?;

        let root = TreeNode::build(&tree, tree.root());
        if self.json {
            output.print(&serde_json::to_string_pretty(&root)?);
        } else {
            for line in render_lines(&root, &output) {
                output.print(&line);
            }
        }
        Ok(())
    }
}

/// One indented line per page.
fn render_lines(root: &TreeNode, output: &Output) -> Vec<String> {
    fn walk(node: &TreeNode, depth: usize, output: &Output, lines: &mut Vec<String>) {
        let mut line = format!(
            "{}{} {}",
            "  ".repeat(depth),
            output.highlighted(&node.url),
            output.dimmed(&format!("[{}]", node.template)),
        );
        if !node.visible {
            line.push_str(&output.dimmed(" hidden"));
        }
        if node.assets > 0 {
            line.push_str(&format!(" {} assets", node.assets));
        }
        lines.push(line);

        for child in &node.children {
            walk(child, depth + 1, output, lines);
        }
    }

    let mut lines = Vec::new();
    walk(root, 0, output, &mut lines);
    lines
}
