use clap::Args;
use dynfields::{Config, SchemaTree, Selection};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::SelectorArgs;
use crate::output::{self, Format};

/// Show declared and retained fields for every node of a document.
#[derive(Debug, Args)]
pub struct ExplainCmd {
    #[command(flatten)]
    pub input: SelectorArgs,
}

#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    pub path: String,
    pub many: bool,
    pub declared: String,
    pub retained: String,
}

pub fn run(cmd: ExplainCmd, config: &Config, format: Format) -> anyhow::Result<()> {
    let document = cmd.input.read_document()?;
    let tree = SchemaTree::infer(&document);
    let selection = Selection::from_selectors(&tree, &cmd.input.selectors(config), config);

    let rows: Vec<NodeRow> = tree
        .iter()
        .map(|(id, node)| {
            let path = tree.path(id);
            NodeRow {
                path: if path.is_empty() {
                    "(root)".to_string()
                } else {
                    config.join_path(&path)
                },
                many: node.is_many(),
                declared: node.field_names().collect::<Vec<_>>().join(","),
                retained: selection.retained(id).join(","),
            }
        })
        .collect();

    output::print_table(&rows, format)
}
