//! Canonical hex rendering of code payloads.
//!
//! Payloads are kept as the text a user edits: uppercase hex grouped into lines of two
//! 8 digit words separated by a single space. The text only has to be valid when it is
//! turned back into bytes, which lets an invalid line survive a round trip through the
//! text formats and be reported when a binary table is written.

use derive_more::derive::{Display, From};
use winnow::combinator::separated_pair;
use winnow::prelude::*;
use winnow::stream::AsChar;
use winnow::token::take_while;
use winnow::PResult;

use crate::error::{Error, Result};

/// Number of hex digits in one payload word
const WORD_DIGITS: usize = 8;

/// Number of hex digits in one payload line
const LINE_DIGITS: usize = WORD_DIGITS * 2;

/// Convert raw bytes to uppercase hex, with a space after every 8 digits and a newline
/// after every 16.
pub fn format(raw: &[u8]) -> String {
    let digits = hex::encode_upper(raw);
    let mut out = String::with_capacity(digits.len() + digits.len() / WORD_DIGITS);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % LINE_DIGITS == 0 {
            out.push('\n');
        } else if i > 0 && i % WORD_DIGITS == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Strip all whitespace and decode the remaining hex digits.
pub fn parse(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => Error::MalformedHex {
            position: index,
            character: Some(c),
        },
        _ => Error::MalformedHex {
            position: digits.len(),
            character: None,
        },
    })
}

fn word<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(WORD_DIGITS, AsChar::is_hex_digit).parse_next(input)
}

/// Parser for a single `XXXXXXXX XXXXXXXX` line.
pub fn code_line<'s>(input: &mut &'s str) -> PResult<(&'s str, &'s str)> {
    separated_pair(word, ' ', word).parse_next(input)
}

/// Whether the whole line is exactly two 8 digit hex words separated by one space.
pub fn is_code_line(line: &str) -> bool {
    code_line.parse(line).is_ok()
}

/// Locate the first character of `line` that breaks the `XXXXXXXX XXXXXXXX` shape.
///
/// Returns `None` when the line is valid, `Some(None)` when the line simply ends early
/// and `Some(Some(c))` for an offending character.
pub fn find_invalid(line: &str) -> Option<Option<char>> {
    let mut chars = line.chars();
    for position in 0..=LINE_DIGITS {
        let Some(c) = chars.next() else {
            return Some(None);
        };
        let valid = if position == WORD_DIGITS {
            c == ' '
        } else {
            c.is_ascii_hexdigit()
        };
        if !valid {
            return Some(Some(c));
        }
    }
    chars.next().map(Some)
}

/// Payload of a code as hex text.
#[derive(Debug, Display, From, Clone, Default, PartialEq, Eq, Hash)]
#[from(forward)]
pub struct HexCode(String);

impl HexCode {
    /// Render raw bytes in canonical form.
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self(format(raw))
    }

    /// The text as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload holds no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// The non-blank lines of the payload, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Number of non-blank lines
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Approximate payload size in bytes, used for ordering.
    pub fn byte_len(&self) -> usize {
        self.0.chars().filter(char::is_ascii_hexdigit).count() / 2
    }

    /// Decode the whole payload, ignoring line structure.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        parse(&self.0)
    }

    /// Find the first line that is not a valid code line.
    ///
    /// Yields the 1-based line number and the offending character.
    pub fn first_invalid_line(&self) -> Option<(usize, Option<char>)> {
        self.lines()
            .enumerate()
            .find_map(|(i, line)| find_invalid(line).map(|c| (i + 1, c)))
    }

    /// Whether every line is a valid code line
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.first_invalid_line().is_none()
    }

    /// Re-render the payload in canonical form.
    pub fn normalized(&self) -> Result<Self> {
        self.to_bytes().map(|b| Self::from_bytes(&b))
    }

    /// Append the lines of another payload.
    pub fn append(&mut self, other: &HexCode) {
        if other.is_empty() {
            return;
        }
        if !self.0.is_empty() && !self.0.ends_with('\n') {
            self.0.push('\n');
        }
        self.0.push_str(other.0.trim_end());
    }

    /// Uppercase copy, as the text formats store it
    pub fn to_uppercase(&self) -> Self {
        Self(self.0.to_uppercase())
    }

    /// Lowercase copy, as Dolphin expects it
    pub fn to_lowercase(&self) -> Self {
        Self(self.0.to_lowercase())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_groups_words_and_lines() {
        #[rustfmt::skip]
        let raw = [
            0x04, 0x00, 0x12, 0x34, 0x38, 0x00, 0x00, 0x00,
            0xC2, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];

        assert_eq!(format(&raw), "04001234 38000000\nC2000000 00000001");
    }

    #[test]
    fn format_partial_line() {
        assert_eq!(format(&[0xDE, 0xAD, 0xBE, 0xEF]), "DEADBEEF");
        assert_eq!(format(&[]), "");
    }

    #[test]
    fn parse_strips_whitespace() -> Result<()> {
        assert_eq!(
            parse(" 04001234 38000000\r\n\tc2000000 00000001 ")?,
            vec![0x04, 0x00, 0x12, 0x34, 0x38, 0x00, 0x00, 0x00, 0xC2, 0, 0, 0, 0, 0, 0, 1]
        );
        Ok(())
    }

    #[test]
    fn parse_rejects_non_hex() {
        match parse("0400123G 38000000") {
            Err(Error::MalformedHex {
                position,
                character,
            }) => {
                assert_eq!(position, 7);
                assert_eq!(character, Some('G'));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_odd_length() {
        assert!(matches!(
            parse("0400123"),
            Err(Error::MalformedHex {
                character: None,
                ..
            })
        ));
    }

    #[test]
    fn format_after_parse_is_normalized() -> Result<()> {
        let messy = "04001234 38000000\n  c2000000   00000001\n";
        assert_eq!(format(&parse(messy)?), "04001234 38000000\nC2000000 00000001");

        let canonical = "04001234 38000000\nC2000000 00000001";
        assert_eq!(format(&parse(canonical)?), canonical);
        Ok(())
    }

    #[test]
    fn code_line_shape() {
        assert!(is_code_line("04001234 38000000"));
        assert!(is_code_line("0400abcd 3800EF00"));
        assert!(!is_code_line("04001234 3800000"));
        assert!(!is_code_line("04001234  38000000"));
        assert!(!is_code_line("0400123438000000"));
        assert!(!is_code_line("04001234 38000000 "));
        assert!(!is_code_line("ZZZZZZZZ 00000000"));
    }

    #[test]
    fn find_invalid_reports_offender() {
        assert_eq!(find_invalid("04001234 38000000"), None);
        assert_eq!(find_invalid("ZZZZZZZZ 00000000"), Some(Some('Z')));
        assert_eq!(find_invalid("04001234-38000000"), Some(Some('-')));
        assert_eq!(find_invalid("04001234 3800"), Some(None));
        assert_eq!(find_invalid("04001234 38000000x"), Some(Some('x')));
    }

    #[test]
    fn first_invalid_line_is_one_based() {
        let code = HexCode::from("04001234 38000000\nC2000000 0000000Q\n60000000 00000000");
        assert_eq!(code.first_invalid_line(), Some((2, Some('Q'))));
        assert!(!code.is_valid());
    }

    #[test]
    fn append_keeps_line_structure() {
        let mut code = HexCode::from("04001234 38000000");
        code.append(&HexCode::from("C2000000 00000001\n"));
        assert_eq!(code.as_str(), "04001234 38000000\nC2000000 00000001");
        assert_eq!(code.line_count(), 2);
        assert_eq!(code.byte_len(), 16);
    }
}
