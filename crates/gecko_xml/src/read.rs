//! Types for reading XML code databases
//!

use std::collections::HashMap;
use std::io::Read;

use gecko_list::{Code, CodeList, Diagnostics, HexCode, MismatchPolicy, NodeId, Placeholder};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};

/// An entry of the database before it is added to a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Category { name: String, children: Vec<Entry> },
    Code { name: String, code: Code },
}

/// The contents of a database
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Database {
    /// Text of the `<id>` element, if any
    pub game_id: Option<String>,
    pub entries: Vec<Entry>,
}

/// An element that has been opened but not closed yet
#[derive(Debug)]
enum Open {
    Category { name: String, children: Vec<Entry> },
    Code { name: String, code: Code, payload: Option<String> },
    Payload(String),
    Id(String),
    Other,
}

impl Database {
    /// Parse the text of a database.
    #[instrument(skip_all, err)]
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut buf = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut database = Self::default();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(source) => return Err(malformed(&reader, source)),
            };

            match event {
                Event::Start(element) => {
                    let open = open(&element, stack.last_mut()).map_err(|e| malformed(&reader, e))?;
                    stack.push(open);
                }
                Event::Empty(element) => {
                    let open = open(&element, stack.last_mut()).map_err(|e| malformed(&reader, e))?;
                    close(open, &mut stack, &mut database);
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                    push_text(&mut stack, &text);
                }
                Event::CData(text) => push_text(&mut stack, &String::from_utf8_lossy(&text)),
                Event::End(_) => {
                    if let Some(open) = stack.pop() {
                        close(open, &mut stack, &mut database);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        debug!("read {} top level entries", database.entries.len());
        Ok(database)
    }

    /// Add the entries to `list`, keeping their nesting.
    ///
    /// The game id is reconciled first, so an aborted import leaves `list` untouched.
    pub fn apply(
        self,
        list: &mut CodeList,
        policy: MismatchPolicy,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if let Some(game_id) = &self.game_id {
            list.reconcile_game_id(game_id, policy, diagnostics)?;
        }
        add_entries(list, None, self.entries)
    }
}

fn malformed(reader: &Reader<&[u8]>, source: quick_xml::Error) -> Error {
    Error::XmlError {
        position: reader.buffer_position() as u64,
        source,
    }
}

fn attributes(element: &BytesStart) -> quick_xml::Result<HashMap<String, String>> {
    element
        .attributes()
        .map(|attr| {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            Ok((key, value))
        })
        .collect()
}

/// Decide what an element is, attaching placeholders to their code right away.
fn open(element: &BytesStart, parent: Option<&mut Open>) -> quick_xml::Result<Open> {
    let mut attributes = attributes(element)?;
    let mut take = |key: &str| attributes.remove(key).unwrap_or_default();
    trace!("<{}>", String::from_utf8_lossy(element.name().as_ref()));

    Ok(match (element.name().as_ref(), parent) {
        (b"category", _) => Open::Category {
            name: take("name").trim().to_string(),
            children: Vec::new(),
        },
        (b"code", _) => Open::Code {
            name: take("name").trim().to_string(),
            code: Code {
                author: take("author"),
                comment: take("comment"),
                ..Default::default()
            },
            payload: None,
        },
        (b"placeholder", Some(Open::Code { code, .. })) => {
            code.placeholders.push(Placeholder {
                letter: take("letter"),
                kind: take("type").trim().parse().unwrap_or_default(),
                comment: take("comment"),
                args: take("args").split(',').map(str::to_string).collect(),
                recursive: take("recursive").trim() == "1",
            });
            Open::Other
        }
        (_, Some(Open::Code { payload: payload @ None, .. })) => {
            *payload = Some(String::new());
            Open::Payload(String::new())
        }
        (b"id", Some(Open::Category { .. }) | Some(Open::Other) | None) => Open::Id(String::new()),
        _ => Open::Other,
    })
}

fn push_text(stack: &mut [Open], text: &str) {
    if let Some(Open::Payload(buffer) | Open::Id(buffer)) = stack.last_mut() {
        buffer.push_str(text);
    }
}

fn close(open: Open, stack: &mut [Open], database: &mut Database) {
    let entry = match open {
        Open::Category { name, children } => Entry::Category { name, children },
        Open::Code {
            name,
            mut code,
            payload,
        } => {
            code.lines = HexCode::from(normalize(payload.as_deref().unwrap_or_default()));
            Entry::Code { name, code }
        }
        Open::Payload(text) => {
            if let Some(Open::Code { payload, .. }) = stack.last_mut() {
                *payload = Some(text);
            }
            return;
        }
        Open::Id(text) => {
            database.game_id = Some(text.trim().to_string());
            return;
        }
        Open::Other => return,
    };

    let siblings = stack
        .iter_mut()
        .rev()
        .find_map(|open| match open {
            Open::Category { children, .. } => Some(children),
            _ => None,
        })
        .unwrap_or(&mut database.entries);
    siblings.push(entry);
}

/// Drop indentation and blank lines, upper casing what is left.
fn normalize(payload: &str) -> String {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("\n")
}

fn add_entries(list: &mut CodeList, parent: Option<NodeId>, entries: Vec<Entry>) -> Result<()> {
    for entry in entries {
        match entry {
            Entry::Category { name, children } => {
                let id = list.add_category(parent, name)?;
                add_entries(list, Some(id), children)?;
            }
            Entry::Code { name, code } => {
                let name = if name.is_empty() {
                    list.placeholder_name()
                } else {
                    name
                };
                list.add_code(parent, name, code)?;
            }
        }
    }
    Ok(())
}

/// Read a database into a new [`CodeList`].
pub fn decode<R: Read>(reader: R) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let diagnostics = decode_into(reader, &mut list, MismatchPolicy::Continue)?;
    Ok((list, diagnostics))
}

/// Read a database and append its entries to `list`. Imported codes are disabled.
#[instrument(skip_all, err)]
pub fn decode_into<R: Read>(
    mut reader: R,
    list: &mut CodeList,
    policy: MismatchPolicy,
) -> Result<Diagnostics> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;

    let database = Database::parse(&gecko_list::text::decode(&raw))?;
    let mut diagnostics = Diagnostics::new();
    database.apply(list, policy, &mut diagnostics)?;
    Ok(diagnostics)
}
