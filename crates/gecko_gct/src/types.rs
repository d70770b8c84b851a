//! Base types for the structure of a code table.

use std::ops::RangeInclusive;

use binrw::{BinRead, BinWrite};

/// `00D0C0DE 00D0C0DE`, the first line of every table
pub const MAGIC: [u8; 8] = [0x00, 0xD0, 0xC0, 0xDE, 0x00, 0xD0, 0xC0, 0xDE];

/// `F0000000 00000000`, the last line of every table
pub const TERMINATOR: [u8; 8] = [0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Size of one code line
pub const LINE_SIZE: usize = 8;

/// Codetype closing the open ended codetypes
pub const END_IF: u8 = 0xE0;

/// A single 8 byte code line
///
/// All data is stored in big endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct GctLine {
    /// Codetype and address
    pub opcode: u32,

    /// Value, or a length for the variable length codetypes
    pub value: u32,
}

impl GctLine {
    /// The codetype, the first byte of the line
    pub fn codetype(&self) -> u8 {
        self.opcode.to_be_bytes()[0]
    }

    /// The line as it is stored
    pub fn to_bytes(&self) -> [u8; LINE_SIZE] {
        let mut raw = [0; LINE_SIZE];
        raw[..4].copy_from_slice(&self.opcode.to_be_bytes());
        raw[4..].copy_from_slice(&self.value.to_be_bytes());
        raw
    }
}

/// How the length of a code is found from its first line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LengthRule {
    /// The code is a single line
    SingleLine,
    /// The code always has this many lines
    FixedLines(u32),
    /// The value holds the number of data bytes following the first line
    FromByteCount,
    /// The value holds the number of lines following the first line
    FromLineCount,
    /// The code runs up to and including a line of the given codetype
    UntilTerminator(u8),
}

/// Codetypes whose length is not a single line. Anything missing is [`LengthRule::SingleLine`].
pub const LENGTH_RULES: &[(RangeInclusive<u8>, LengthRule)] = &[
    (0x06..=0x07, LengthRule::FromByteCount),
    (0x08..=0x09, LengthRule::FixedLines(2)),
    (0x20..=0x2F, LengthRule::UntilTerminator(END_IF)),
    (0x40..=0x40, LengthRule::UntilTerminator(END_IF)),
    (0x42..=0x42, LengthRule::UntilTerminator(END_IF)),
    (0x48..=0x48, LengthRule::UntilTerminator(END_IF)),
    (0x4A..=0x4A, LengthRule::UntilTerminator(END_IF)),
    (0xA8..=0xAE, LengthRule::UntilTerminator(END_IF)),
    (0xC0..=0xC0, LengthRule::FromLineCount),
    (0xC2..=0xC5, LengthRule::FromLineCount),
    (0xF2..=0xF5, LengthRule::FromLineCount),
    (0xF6..=0xF6, LengthRule::UntilTerminator(END_IF)),
];

/// Lines still owed to the code being read
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Remaining {
    /// A known number of lines, never zero
    Lines(u32),
    /// Lines up to and including one with this codetype
    UntilCodetype(u8),
}

impl Remaining {
    fn lines(count: u32) -> Option<Self> {
        (count > 0).then_some(Self::Lines(count))
    }

    /// State after a line with `codetype` was taken, `None` once the code is complete
    pub fn advance(self, codetype: u8) -> Option<Self> {
        match self {
            Self::Lines(count) => Self::lines(count - 1),
            Self::UntilCodetype(end) if end == codetype => None,
            Self::UntilCodetype(_) => Some(self),
        }
    }
}

impl LengthRule {
    /// Look up the rule for a codetype.
    pub fn for_codetype(codetype: u8) -> Self {
        LENGTH_RULES
            .iter()
            .find(|(range, _)| range.contains(&codetype))
            .map_or(Self::SingleLine, |(_, rule)| *rule)
    }

    /// Lines owed after `first`, `None` when the code is complete.
    pub fn remaining(self, first: &GctLine) -> Option<Remaining> {
        match self {
            Self::SingleLine => None,
            Self::FixedLines(count) => Remaining::lines(count.saturating_sub(1)),
            Self::FromByteCount => {
                Remaining::lines(first.value.div_ceil(LINE_SIZE as u32).saturating_sub(1))
            }
            Self::FromLineCount => Remaining::lines(first.value.saturating_sub(1)),
            Self::UntilTerminator(end) => Some(Remaining::UntilCodetype(end)),
        }
    }
}

/// Head of the index trailing an extended table
///
/// Sits 4 padding bytes after the terminator. All data is stored in big endian format
#[derive(BinRead, BinWrite, Debug, Default, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct IndexHeader {
    /// Offset of the game id and game name from the start of this header, 0 when absent
    #[brw(pad_before = 4)]
    pub game_pointer: u32,

    /// The number of records following
    pub count: u32,
}

/// One code of an extended table
///
/// All data is stored in big endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct IndexRecord {
    /// The offset from the start of the file to the first line of the code
    pub offset: u32,

    /// The number of lines of the code
    pub lines: u32,

    /// Distance to the name, counted from the field after it minus 8
    pub name_delta: u32,

    /// Distance to the comment, counted from the end of the record minus 12
    pub comment_delta: u32,
}

impl IndexRecord {
    /// Size of a record
    pub const SIZE: usize = 16;

    /// Absolute position of the name for a record stored at `at`
    pub fn name_position(&self, at: usize) -> usize {
        (at + 12 + self.name_delta as usize).saturating_sub(8)
    }

    /// Absolute position of the comment for a record stored at `at`, `None` when it has none
    pub fn comment_position(&self, at: usize) -> Option<usize> {
        let end = at + Self::SIZE;
        let position = (end + self.comment_delta as usize).saturating_sub(12);
        (position > end).then_some(position)
    }

    /// The delta that makes [`IndexRecord::name_position`] resolve to `position`
    pub fn name_delta_for(at: usize, position: usize) -> u32 {
        (position + 8 - (at + 12)) as u32
    }

    /// The delta that makes [`IndexRecord::comment_position`] resolve to `position`
    pub fn comment_delta_for(at: usize, position: usize) -> u32 {
        (position + 12 - (at + Self::SIZE)) as u32
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::*;

    fn line(opcode: u32, value: u32) -> GctLine {
        GctLine { opcode, value }
    }

    #[test]
    fn rules_per_codetype() {
        assert_eq!(LengthRule::for_codetype(0x04), LengthRule::SingleLine);
        assert_eq!(LengthRule::for_codetype(0x07), LengthRule::FromByteCount);
        assert_eq!(LengthRule::for_codetype(0x09), LengthRule::FixedLines(2));
        assert_eq!(LengthRule::for_codetype(0x2C), LengthRule::UntilTerminator(END_IF));
        assert_eq!(LengthRule::for_codetype(0x41), LengthRule::SingleLine);
        assert_eq!(LengthRule::for_codetype(0x4A), LengthRule::UntilTerminator(END_IF));
        assert_eq!(LengthRule::for_codetype(0xAF), LengthRule::SingleLine);
        assert_eq!(LengthRule::for_codetype(0xC1), LengthRule::SingleLine);
        assert_eq!(LengthRule::for_codetype(0xC2), LengthRule::FromLineCount);
        assert_eq!(LengthRule::for_codetype(0xF6), LengthRule::UntilTerminator(END_IF));
        assert_eq!(LengthRule::for_codetype(0xE0), LengthRule::SingleLine);
    }

    #[test]
    fn byte_count_rounds_up() {
        let first = line(0x06001234, 0x11);
        assert_eq!(
            LengthRule::FromByteCount.remaining(&first),
            Some(Remaining::Lines(2))
        );
        assert_eq!(LengthRule::FromByteCount.remaining(&line(0x06001234, 8)), None);
        assert_eq!(LengthRule::FromByteCount.remaining(&line(0x06001234, 0)), None);
    }

    #[test]
    fn line_count_and_fixed() {
        assert_eq!(
            LengthRule::FromLineCount.remaining(&line(0xC2001234, 3)),
            Some(Remaining::Lines(2))
        );
        assert_eq!(LengthRule::FromLineCount.remaining(&line(0xC2001234, 1)), None);
        assert_eq!(
            LengthRule::FixedLines(2).remaining(&line(0x08001234, 0)),
            Some(Remaining::Lines(1))
        );
    }

    #[test]
    fn advance_until_end_if() {
        let state = Remaining::UntilCodetype(END_IF);
        assert_eq!(state.advance(0x20), Some(state));
        assert_eq!(state.advance(END_IF), None);
        assert_eq!(Remaining::Lines(2).advance(0x00), Some(Remaining::Lines(1)));
        assert_eq!(Remaining::Lines(1).advance(0x00), None);
    }

    #[test]
    fn read_line() -> binrw::BinResult<()> {
        let mut input = Cursor::new([0xC2, 0x7B, 0xA1, 0x64, 0x00, 0x00, 0x00, 0x02]);
        let actual = GctLine::read(&mut input)?;
        assert_eq!(actual, line(0xC27BA164, 2));
        assert_eq!(actual.codetype(), 0xC2);
        assert_eq!(actual.to_bytes(), input.into_inner());
        Ok(())
    }

    #[test]
    fn write_index_header() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x28,
            0x00, 0x00, 0x00, 0x02,
        ];

        let header = IndexHeader {
            game_pointer: 0x28,
            count: 2,
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;
        assert_eq!(actual, expected);

        assert_eq!(IndexHeader::read(&mut Cursor::new(expected))?, header);
        Ok(())
    }

    #[test]
    fn record_positions() {
        let at = 0x40;
        let record = IndexRecord {
            name_delta: IndexRecord::name_delta_for(at, 0x80),
            comment_delta: IndexRecord::comment_delta_for(at, 0x90),
            ..Default::default()
        };
        assert_eq!(record.name_position(at), 0x80);
        assert_eq!(record.comment_position(at), Some(0x90));

        let no_comment = IndexRecord::default();
        assert_eq!(no_comment.comment_position(at), None);
        let at_cursor = IndexRecord {
            comment_delta: 12,
            ..Default::default()
        };
        assert_eq!(at_cursor.comment_position(at), None);
    }
}
