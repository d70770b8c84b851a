//! Types for writing code tables
//!

use std::io::{Cursor, Write};

use binrw::BinWrite;
use bon::Builder;
use byteorder::WriteBytesExt;
use gecko_list::error::Error as ListError;
use gecko_list::hex::{self, find_invalid};
use gecko_list::{Code, CodeList, Diagnostics, Event, InvalidCodePolicy};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::types::{IndexHeader, IndexRecord, LINE_SIZE, MAGIC, TERMINATOR};

/// Options for how the code table should be written
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct GctWriterOptions {
    /// Only write codes marked as enabled
    #[builder(default)]
    pub enabled_only: bool,

    /// Append an index holding names, comments and exact code boundaries
    #[builder(default)]
    pub extended: bool,

    /// What to do with a code line that is not valid hex
    #[builder(default)]
    pub on_invalid: InvalidCodePolicy,
}

/// A code written to the table, remembered for the index
#[derive(Debug, Clone)]
struct WrittenCode {
    offset: usize,
    lines: usize,
    title: String,
    comment: String,
}

/// Code table generator
///
/// Everything is kept in memory until [`GctWriter::finish`], so an aborted table never
/// reaches the inner writer.
///
/// ```
/// # fn doit() -> gecko_gct::error::Result<()>
/// # {
/// use gecko_gct::write::{GctWriter, GctWriterOptions};
/// use gecko_list::Code;
///
/// let mut gct = GctWriter::new(Vec::new(), GctWriterOptions::default());
/// gct.write_code("Moon Jump", &Code::new("04001234 00000001"))?;
///
/// let (data, diagnostics) = gct.finish()?;
/// assert_eq!(data.len(), 24);
/// assert!(diagnostics.is_empty());
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct GctWriter<W: Write> {
    inner: W,
    options: GctWriterOptions,
    body: Vec<u8>,
    written: Vec<WrittenCode>,
    game: Option<(String, String)>,
    diagnostics: Diagnostics,
}

impl<W: Write> GctWriter<W> {
    /// Initializes the table.
    pub fn new(inner: W, options: GctWriterOptions) -> GctWriter<W> {
        GctWriter {
            inner,
            options,
            body: Vec::new(),
            written: Vec::new(),
            game: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Record the game in the index of an extended table. An empty id records nothing.
    pub fn set_game(&mut self, id: &str, name: &str) {
        self.game = (!id.is_empty()).then(|| (id.to_string(), name.to_string()));
    }

    /// Validate and append the lines of a code.
    ///
    /// With [`InvalidCodePolicy::Truncate`] the lines before an invalid one are kept and the
    /// rest of the code is dropped; with [`InvalidCodePolicy::Abort`] the error is returned
    /// and the writer should be discarded.
    #[instrument(skip(self, code), err)]
    pub fn write_code(&mut self, title: &str, code: &Code) -> Result<()> {
        let offset = LINE_SIZE + self.body.len();
        let mut lines = 0;

        for (i, line) in code.lines.lines().enumerate() {
            if let Some(character) = find_invalid(line) {
                let (code, line) = (title.to_string(), i + 1);
                match self.options.on_invalid {
                    InvalidCodePolicy::Abort => {
                        return Err(ListError::InvalidCharacter {
                            code,
                            line,
                            character,
                        }
                        .into())
                    }
                    InvalidCodePolicy::Truncate => {
                        self.diagnostics.push(Event::InvalidCharacter {
                            code,
                            line,
                            character,
                        });
                        break;
                    }
                }
            }
            self.body.extend_from_slice(&hex::parse(line)?);
            lines += 1;
        }

        if lines == 0 {
            warn!("nothing written for {}", title);
            return Ok(());
        }

        self.written.push(WrittenCode {
            offset,
            lines,
            title: title.to_string(),
            comment: code.comment.clone(),
        });
        Ok(())
    }

    /// Write the table, and its index if requested, to the inner writer.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<(W, Diagnostics)> {
        let mut out = Cursor::new(Vec::with_capacity(self.body.len() + 2 * LINE_SIZE));
        out.write_all(&MAGIC)?;
        out.write_all(&self.body)?;
        out.write_all(&TERMINATOR)?;

        if self.options.extended {
            self.write_index(&mut out)?;
        }

        debug!("{} codes, {} bytes", self.written.len(), out.get_ref().len());
        self.inner.write_all(out.get_ref())?;
        self.inner.flush()?;
        Ok((self.inner, self.diagnostics))
    }

    fn write_index(&self, out: &mut Cursor<Vec<u8>>) -> Result<()> {
        let head = out.get_ref().len() + 4;
        let records_end = head + 8 + self.written.len() * IndexRecord::SIZE;

        // strings follow the records in the order game, then name and comment per code
        let mut strings: Vec<u8> = Vec::new();
        let mut push_string = |text: &str| -> Result<usize> {
            let position = records_end + strings.len();
            strings.write_all(text.as_bytes())?;
            strings.write_u8(0)?;
            Ok(position)
        };

        let game_pointer = match &self.game {
            Some((id, name)) => {
                let position = push_string(id)?;
                push_string(name)?;
                (position - head) as u32
            }
            None => 0,
        };

        let mut records = Vec::with_capacity(self.written.len());
        for (i, code) in self.written.iter().enumerate() {
            let at = head + 8 + i * IndexRecord::SIZE;
            let name = push_string(&code.title)?;
            let comment_delta = if code.comment.is_empty() {
                0
            } else {
                IndexRecord::comment_delta_for(at, push_string(&code.comment)?)
            };
            records.push(IndexRecord {
                offset: code.offset as u32,
                lines: code.lines as u32,
                name_delta: IndexRecord::name_delta_for(at, name),
                comment_delta,
            });
        }

        IndexHeader {
            game_pointer,
            count: records.len() as u32,
        }
        .write(out)?;
        for record in records {
            record.write(out)?;
        }
        out.write_all(&strings)?;
        Ok(())
    }
}

/// Write a code list as a code table, flattening categories.
#[instrument(skip_all, err)]
pub fn encode<W: Write>(list: &CodeList, writer: W, options: GctWriterOptions) -> Result<Diagnostics> {
    let mut gct = GctWriter::new(writer, options);
    gct.set_game(list.game_id(), &list.game_name);

    for (_, node, code) in list.codes() {
        if options.enabled_only && !code.enabled {
            continue;
        }
        gct.write_code(&node.title(), code)?;
    }

    let (_, diagnostics) = gct.finish()?;
    Ok(diagnostics)
}
