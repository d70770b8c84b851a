//! Types for writing text code lists
//!

use std::io::Write;

use bon::Builder;
use gecko_list::name::LEGACY_UNKNOWN_GAME_ID;
use gecko_list::{CodeList, NodeId, NodeKind};
use tracing::instrument;

use crate::error::Result;

/// Line break written between lines
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LineEnding {
    /// `\r\n`, as the Windows tools write it
    #[default]
    CrLf,
    /// `\n`
    Lf,
}

/// Options for how the text file should be written
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct TxtWriterOptions {
    /// The line break to use
    #[builder(default)]
    pub line_ending: LineEnding,
}

fn write_node(list: &CodeList, id: NodeId, level: usize, out: &mut String) {
    let Some(node) = list.get(id) else {
        return;
    };

    match &node.kind {
        NodeKind::Category(children) => {
            let marker = "#".repeat(level);
            out.push_str(&format!("{}{}\n\n", marker, node.name));
            for child in children {
                write_node(list, *child, level + 1, out);
            }
            out.push_str(&format!("{}\n\n", marker));
        }
        NodeKind::Code(code) => {
            out.push_str(&node.title());
            out.push('\n');
            let prefix = if code.enabled { "* " } else { "" };
            for line in code.lines.lines() {
                out.push_str(prefix);
                out.push_str(line);
                out.push('\n');
            }
            for line in code.comment.lines() {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
    }
}

/// Render a code list as text.
pub fn to_string(list: &CodeList, options: TxtWriterOptions) -> String {
    let mut out = String::new();

    let game_id = match list.game_id() {
        "" => LEGACY_UNKNOWN_GAME_ID,
        id => id,
    };
    out.push_str(game_id);
    out.push('\n');
    if !list.game_name.is_empty() {
        out.push_str(&list.game_name);
        out.push('\n');
    }
    out.push('\n');

    for id in list.roots() {
        write_node(list, *id, 1, &mut out);
    }

    match options.line_ending {
        LineEnding::Lf => out,
        LineEnding::CrLf => out.replace('\n', "\r\n"),
    }
}

/// Write a code list as text.
#[instrument(skip_all, err)]
pub fn encode<W: Write>(list: &CodeList, mut writer: W, options: TxtWriterOptions) -> Result<()> {
    writer.write_all(to_string(list, options).as_bytes())?;
    writer.flush()?;
    Ok(())
}
