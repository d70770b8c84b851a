//! Types for reading code tables
//!

use std::io::{Cursor, Read};

use binrw::BinRead;
use byteorder::ReadBytesExt;
use gecko_list::name::{placeholder, split_author};
use gecko_list::{Code, CodeList, Diagnostics, Event, HexCode, MismatchPolicy, NodeId};
use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};
use crate::types::{GctLine, IndexHeader, IndexRecord, LengthRule, Remaining, LINE_SIZE, MAGIC, TERMINATOR};

/// Size of the padding and index head following the terminator
const INDEX_HEAD_SIZE: usize = 12;

/// Offset of the first line at or after `from` equal to `needle`, stepping a line at a time.
pub fn find_line(data: &[u8], from: usize, needle: &[u8; LINE_SIZE]) -> Option<usize> {
    data.get(from..)?
        .chunks_exact(LINE_SIZE)
        .position(|line| line == needle)
        .map(|i| from + i * LINE_SIZE)
}

/// Offset of the terminator of the table starting at `data[0]`.
pub fn find_terminator(data: &[u8]) -> Option<usize> {
    find_line(data, LINE_SIZE, &TERMINATOR)
}

/// A code as stored in a table, before it is named within a list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Empty for classic tables, which carry no names
    pub name: String,
    pub code: Code,
}

/// The contents of a code table
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GctTable {
    /// Whether the table carried an index
    pub extended: bool,
    /// Game id from the index, if any
    pub game_id: Option<String>,
    /// Game name from the index, if any
    pub game_name: Option<String>,
    pub entries: Vec<TableEntry>,
}

impl GctTable {
    /// Parse a table, reading the index when one follows the terminator.
    #[instrument(skip_all, err)]
    pub fn parse(data: &[u8]) -> Result<(Self, Diagnostics)> {
        let terminator = Self::check(data)?;
        if data.len() >= terminator + LINE_SIZE + INDEX_HEAD_SIZE {
            debug!("{} bytes after the terminator, reading index", data.len() - terminator - LINE_SIZE);
            let table = Self::parse_extended(data, terminator)?;

            // Tables padded with zeroes look like an empty index
            let total = (terminator - LINE_SIZE) / LINE_SIZE;
            let covered: usize = table.entries.iter().map(|e| e.code.lines.line_count()).sum();
            if covered == total {
                return Ok((table, Diagnostics::new()));
            }

            let (table, mut diagnostics) = Self::parse_classic(data)?;
            diagnostics.push(Event::IndexIgnored {
                reason: format!("index covers {} of {} lines", covered, total),
            });
            Ok((table, diagnostics))
        } else {
            Self::parse_classic(data)
        }
    }

    /// Parse a table without looking for an index, inferring code boundaries from codetypes.
    #[instrument(skip_all, err)]
    pub fn parse_classic(data: &[u8]) -> Result<(Self, Diagnostics)> {
        let terminator = Self::check(data)?;
        let mut diagnostics = Diagnostics::new();
        let mut codes: Vec<Vec<u8>> = Vec::new();
        let mut remaining: Option<Remaining> = None;

        let mut cursor = Cursor::new(&data[LINE_SIZE..terminator]);
        while (cursor.position() as usize) < terminator - LINE_SIZE {
            let line = GctLine::read(&mut cursor)?;
            let codetype = line.codetype();

            remaining = match (remaining, codes.last_mut()) {
                (Some(state), Some(current)) => {
                    current.extend_from_slice(&line.to_bytes());
                    state.advance(codetype)
                }
                _ => {
                    codes.push(line.to_bytes().to_vec());
                    LengthRule::for_codetype(codetype).remaining(&line)
                }
            };
            trace!("codetype {:02X}, owing {:?}", codetype, remaining);
        }

        if remaining.is_some() {
            diagnostics.push(Event::UnterminatedCode {
                code: placeholder(codes.len()),
            });
        }

        debug!("read {} codes", codes.len());
        let entries = codes
            .iter()
            .map(|raw| TableEntry {
                name: String::new(),
                code: Code {
                    enabled: true,
                    ..Code::new(HexCode::from_bytes(raw))
                },
            })
            .collect();

        Ok((
            Self {
                entries,
                ..Default::default()
            },
            diagnostics,
        ))
    }

    /// Parse a table through the index following its terminator.
    #[instrument(skip(data), err)]
    pub fn parse_extended(data: &[u8], terminator: usize) -> Result<Self> {
        let head = terminator + LINE_SIZE + 4;
        let mut cursor = Cursor::new(data);
        cursor.set_position((terminator + LINE_SIZE) as u64);
        let header = IndexHeader::read(&mut cursor)?;
        debug!("index with {} records", header.count);

        let (game_id, game_name) = if header.game_pointer == 0 {
            (None, None)
        } else {
            let position = head + header.game_pointer as usize;
            cursor.set_position(position as u64);
            let game_id = read_string(&mut cursor)?;
            let game_name = read_string(&mut cursor)?;
            (Some(game_id), Some(game_name))
        };

        let count = header.count as usize;
        let records_end = count
            .checked_mul(IndexRecord::SIZE)
            .and_then(|size| size.checked_add(head + 8));
        if records_end.map_or(true, |end| end > data.len()) {
            return Err(Error::InvalidIndex(format!(
                "{} records do not fit in {} bytes",
                count,
                data.len()
            )));
        }

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let at = head + 8 + i * IndexRecord::SIZE;
            cursor.set_position(at as u64);
            let record = IndexRecord::read(&mut cursor)?;
            trace!("record {}: {:?}", i, record);

            let start = record.offset as usize;
            let end = start + record.lines as usize * LINE_SIZE;
            let payload = data
                .get(start..end)
                .filter(|_| start >= LINE_SIZE && end <= terminator)
                .ok_or_else(|| {
                    Error::InvalidIndex(format!("record {} points outside the code lines", i))
                })?;

            cursor.set_position(record.name_position(at) as u64);
            let title = read_string(&mut cursor)?;

            let comment = match record.comment_position(at) {
                Some(position) => {
                    cursor.set_position(position as u64);
                    read_string(&mut cursor)?
                }
                None => String::new(),
            };

            let (name, author) = split_author(&title);
            entries.push(TableEntry {
                name: name.to_string(),
                code: Code {
                    lines: HexCode::from_bytes(payload),
                    comment,
                    author: author.to_string(),
                    enabled: true,
                    ..Default::default()
                },
            });
        }

        Ok(Self {
            extended: true,
            game_id,
            game_name,
            entries,
        })
    }

    /// Add the entries to `list` as top level codes, naming unnamed ones.
    ///
    /// The game id is reconciled first, so an aborted import leaves `list` untouched.
    pub fn apply(
        self,
        list: &mut CodeList,
        policy: MismatchPolicy,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<NodeId>> {
        if let Some(game_id) = &self.game_id {
            list.reconcile_game_id(game_id, policy, diagnostics)?;
        }
        if let Some(game_name) = self.game_name.filter(|_| list.game_name.is_empty()) {
            list.game_name = game_name;
        }

        let mut ids = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let name = if entry.name.is_empty() {
                list.placeholder_name()
            } else {
                entry.name
            };
            ids.push(list.add_code(None, name, entry.code)?);
        }
        Ok(ids)
    }

    /// Verify the magic and find the terminator.
    fn check(data: &[u8]) -> Result<usize> {
        if !data.starts_with(&MAGIC) {
            return Err(Error::InvalidMagic);
        }
        find_terminator(data).ok_or(Error::MissingTerminator)
    }
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let mut raw: Vec<u8> = Vec::new();
    loop {
        let char = cursor.read_u8()?;
        if char == b'\0' {
            break;
        }
        raw.push(char);
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Read a code table into a new [`CodeList`].
pub fn decode<R: Read>(reader: R) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let diagnostics = decode_into(reader, &mut list, MismatchPolicy::Continue)?;
    Ok((list, diagnostics))
}

/// Read a code table and append its codes to `list`.
#[instrument(skip_all, err)]
pub fn decode_into<R: Read>(
    mut reader: R,
    list: &mut CodeList,
    policy: MismatchPolicy,
) -> Result<Diagnostics> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let (table, mut diagnostics) = GctTable::parse(&data)?;
    table.apply(list, policy, &mut diagnostics)?;
    Ok(diagnostics)
}
