//! Types for finding the code table of a DOL executable
//!

use std::io::{Cursor, Read};

use binrw::BinRead;
use gecko_gct::read::find_line;
use gecko_gct::types::{LINE_SIZE, MAGIC, TERMINATOR};
use gecko_gct::GctTable;
use gecko_list::{CodeList, Diagnostics, MismatchPolicy};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::types::DolHeader;

/// Where a code table sits inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedTable {
    /// Index of the text section holding the table
    pub section: usize,
    /// File offset of the magic
    pub start: usize,
    /// File offset just past the terminator
    pub end: usize,
    /// File offset of the end of the section
    pub limit: usize,
}

impl EmbeddedTable {
    /// Room for a table, from the magic to the end of the section
    pub fn capacity(&self) -> usize {
        self.limit - self.start
    }
}

/// A DOL executable held in memory
#[derive(Debug, Clone)]
pub struct DolImage {
    header: DolHeader,
    data: Vec<u8>,
}

impl DolImage {
    /// Read a whole executable.
    #[instrument(skip_all, err)]
    pub fn new<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Wrap an executable already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = DolHeader::read(&mut Cursor::new(&data))?;
        debug!("entry point {:#010X}", header.entry);
        Ok(Self { header, data })
    }

    pub fn header(&self) -> &DolHeader {
        &self.header
    }

    /// The raw image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Unwrap and return the raw image
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Find the first code table in the sections that may hold a code handler.
    #[instrument(skip(self), err)]
    pub fn find_table(&self) -> Result<EmbeddedTable> {
        for section in self.header.handler_sections() {
            let offset = section.offset as usize;
            let limit = offset + section.size as usize;
            let Some(bytes) = self.data.get(offset..limit) else {
                warn!("section {} runs past the end of the file", section.index);
                continue;
            };

            let Some(magic) = find_line(bytes, 0, &MAGIC) else {
                debug!("no magic in section {}", section.index);
                continue;
            };
            let Some(terminator) = find_line(bytes, magic + LINE_SIZE, &TERMINATOR) else {
                debug!("no terminator in section {}", section.index);
                continue;
            };

            debug!(
                "table in section {} at {:#X}",
                section.index,
                offset + magic
            );
            return Ok(EmbeddedTable {
                section: section.index,
                start: offset + magic,
                end: offset + terminator + LINE_SIZE,
                limit,
            });
        }

        Err(Error::EmptyImage)
    }

    /// The bytes of an embedded table, magic and terminator included.
    pub fn table_bytes(&self, table: &EmbeddedTable) -> &[u8] {
        &self.data[table.start..table.end]
    }

    /// Decode the embedded table.
    pub fn table(&self) -> Result<(GctTable, Diagnostics)> {
        let table = self.find_table()?;
        Ok(GctTable::parse_classic(self.table_bytes(&table))?)
    }
}

/// Read the code table of an executable into a new [`CodeList`].
pub fn decode<R: Read>(reader: R) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let diagnostics = decode_into(reader, &mut list)?;
    Ok((list, diagnostics))
}

/// Read the code table of an executable and append its codes to `list`.
///
/// Executables carry no game id, so nothing can conflict with the list's.
pub fn decode_into<R: Read>(reader: R, list: &mut CodeList) -> Result<Diagnostics> {
    let (table, mut diagnostics) = DolImage::new(reader)?.table()?;
    table.apply(list, MismatchPolicy::Continue, &mut diagnostics)?;
    Ok(diagnostics)
}
