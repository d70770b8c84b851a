//! Types for reading text code lists
//!

use std::io::Read;

use gecko_list::hex::code_line;
use gecko_list::name::{is_game_id, split_author};
use gecko_list::{Code, CodeList, Diagnostics, HexCode, MismatchPolicy, NodeId};
use tracing::{debug, instrument, trace};
use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::PResult;

use crate::error::Result;

/// One blank-line separated block, classified
#[derive(Debug, Clone, PartialEq)]
enum Block {
    /// A line of `#` only, closing categories down to `depth`
    Close { depth: usize },
    /// A block without payload lines
    Category { level: usize, name: String },
    Code {
        name: String,
        author: String,
        lines: Vec<String>,
        comment: String,
        enabled: bool,
    },
}

/// Game id and game name from the first block
#[derive(Debug, Default, Clone, PartialEq)]
struct Header {
    game_id: String,
    game_name: String,
}

/// `* XXXXXXXX XXXXXXXX` or `XXXXXXXX XXXXXXXX`, returning whether the star was present
fn payload_line<'s>(input: &mut &'s str) -> PResult<(bool, (&'s str, &'s str))> {
    (opt("* ").map(|star| star.is_some()), code_line).parse_next(input)
}

/// Split the text into blocks of non-blank lines.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// The header is a game id and an optional name, never followed by payload lines.
fn parse_header(block: &[&str]) -> Option<Header> {
    let game_id = block.first()?.trim();
    if !is_game_id(game_id) || block.len() > 2 {
        return None;
    }
    if block.iter().any(|line| payload_line.parse(line.trim()).is_ok()) {
        return None;
    }
    Some(Header {
        game_id: game_id.to_string(),
        game_name: block.get(1).map(|l| l.trim().to_string()).unwrap_or_default(),
    })
}

fn parse_block(block: &[&str]) -> Option<Block> {
    let first = block.first()?.trim();
    if first.chars().all(|c| c == '#') {
        return Some(Block::Close {
            depth: first.len().saturating_sub(1),
        });
    }

    let mut name: Option<&str> = None;
    let mut lines = Vec::new();
    let mut comment: Vec<&str> = Vec::new();
    let mut enabled = false;

    for line in block {
        match payload_line.parse(line.trim()) {
            Ok((star, (address, value))) => {
                enabled |= star;
                lines.push(format!("{} {}", address, value).to_uppercase());
            }
            Err(_) if name.is_none() => name = Some(line.trim()),
            Err(_) => comment.push(line),
        }
    }

    let title = name.unwrap_or_default();
    if lines.is_empty() {
        let hashes = title.chars().take_while(|c| *c == '#').count();
        return Some(Block::Category {
            level: hashes.saturating_sub(1),
            name: title[hashes..].trim().to_string(),
        });
    }

    let (name, author) = split_author(title);
    Some(Block::Code {
        name: name.to_string(),
        author: author.to_string(),
        lines,
        comment: comment.join("\n"),
        enabled,
    })
}

/// Read a text code list into a new [`CodeList`].
pub fn decode<R: Read>(reader: R) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let diagnostics = decode_into(reader, &mut list, MismatchPolicy::Continue)?;
    Ok((list, diagnostics))
}

/// Read a text code list and append its nodes to `list`.
///
/// When the file names another game than `list`, `policy` decides whether the import goes
/// ahead; an aborted import leaves `list` untouched.
#[instrument(skip_all, err)]
pub fn decode_into<R: Read>(
    mut reader: R,
    list: &mut CodeList,
    policy: MismatchPolicy,
) -> Result<Diagnostics> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let text = gecko_list::text::decode(&raw);
    let blocks = split_blocks(&text);

    let mut diagnostics = Diagnostics::new();
    let header = blocks.first().and_then(|b| parse_header(b));
    let body = &blocks[usize::from(header.is_some())..];

    if let Some(header) = header {
        debug!("found header for {}", header.game_id);
        list.reconcile_game_id(&header.game_id, policy, &mut diagnostics)?;
        if list.game_name.is_empty() {
            list.game_name = header.game_name;
        }
    }

    // open[d] is the category receiving nodes at depth d + 1
    let mut open: Vec<NodeId> = Vec::new();

    for block in body.iter().filter_map(|b| parse_block(b)) {
        trace!("depth {}: {:?}", open.len(), block);
        match block {
            Block::Close { depth } => open.truncate(depth),
            Block::Category { level, name } => {
                open.truncate(level);
                let parent = open.last().copied();
                open.push(list.add_category(parent, name)?);
            }
            Block::Code {
                name,
                author,
                lines,
                comment,
                enabled,
            } => {
                let name = if name.is_empty() {
                    list.placeholder_name()
                } else {
                    name
                };
                list.add_code(
                    open.last().copied(),
                    name,
                    Code {
                        lines: HexCode::from(lines.join("\n")),
                        comment,
                        author,
                        enabled,
                        ..Default::default()
                    },
                )?;
            }
        }
    }

    Ok(diagnostics)
}
