use clap::Args;
use dynfields::{Config, SchemaTree, Selection};

use super::helpers::SelectorArgs;
use crate::output::{self, Format};

/// Print a JSON document with only the selected fields.
#[derive(Debug, Args)]
pub struct ProjectCmd {
    #[command(flatten)]
    pub input: SelectorArgs,
}

pub fn run(cmd: ProjectCmd, config: &Config, format: Format) -> anyhow::Result<()> {
    let document = cmd.input.read_document()?;
    let tree = SchemaTree::infer(&document);
    let selectors = cmd.input.selectors(config);
    tracing::debug!(?selectors, nodes = tree.len(), "projecting document");

    let selection = Selection::from_selectors(&tree, &selectors, config);
    output::print_one(&selection.project(&tree, &document), format)
}
