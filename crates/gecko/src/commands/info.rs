use std::path::PathBuf;

use clap::Args;
use gecko_list::{CodeList, NodeKind};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use crate::format::load_all;

#[derive(Args)]
pub struct InfoArgs {
    /// Input code lists, merged in order
    #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
    file: Vec<PathBuf>,

    /// Print the list as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Import inputs naming another game, keeping the first game id
    #[arg(long, default_value_t = false)]
    continue_on_mismatch: bool,
}

/// Indented tree of the list, one node per line
pub fn render_tree(list: &CodeList) -> String {
    let mut out = String::new();
    if !list.game_id().is_empty() {
        out.push_str(&format!("{} {}\n", list.game_id().bold(), list.game_name));
    }

    for (depth, _, node) in list.walk() {
        let indent = "  ".repeat(depth);
        match &node.kind {
            NodeKind::Category(children) => {
                out.push_str(&format!("{}{}/ ({})\n", indent, node.name.blue(), children.len()));
            }
            NodeKind::Code(code) => {
                let marker = if code.enabled { "*" } else { " " };
                let lines = code.lines.line_count();
                let title = node.title();
                if code.lines.is_valid() {
                    out.push_str(&format!("{}{} {} ({} lines)\n", indent, marker.green(), title, lines));
                } else {
                    out.push_str(&format!("{}{} {} ({} lines, invalid)\n", indent, marker.green(), title.red(), lines));
                }
            }
        }
    }
    out
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let policy = super::mismatch_policy(self.continue_on_mismatch);
        let (list, _) = load_all(self.file.iter().map(PathBuf::as_path), policy)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&list).into_diagnostic()?);
        } else {
            print!("{}", render_tree(&list));
        }
        Ok(())
    }
}
