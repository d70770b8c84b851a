//! This library handles reading from and creating **Gecko code tables** (GCT).
//!
//! # GCT Format Documentation
//!
//! A code table is the binary form of a list of codes, as loaded by the code handler. All
//! integers are big endian.
//!
//! ## Classic Table
//!
//! | Offset     | Size | Content                         |
//! |------------|------|---------------------------------|
//! | `0x00`     | 8    | magic `00D0C0DE 00D0C0DE`       |
//! | `0x08`     | 8n   | code lines, back to back        |
//! | `0x08+8n`  | 8    | terminator `F0000000 00000000`  |
//!
//! The table carries no code boundaries. They are recovered from the codetype (the first
//! byte of a line) of the first line of every code:
//!
//! | Codetype                                       | Length                                   |
//! |------------------------------------------------|------------------------------------------|
//! | `06`, `07`                                     | ceil(value / 8) lines, at least 1        |
//! | `08`, `09`                                     | 2 lines                                  |
//! | `20`-`2F`, `40`, `42`, `48`, `4A`, `A8`-`AE`, `F6` | up to and including the next `E0` line |
//! | `C0`, `C2`-`C5`, `F2`-`F5`                     | value lines                              |
//! | anything else                                  | 1 line                                   |
//!
//! ## Extended Table
//!
//! Some tools append an index after the terminator, at offset `T`:
//!
//! | Offset          | Size | Content                                                   |
//! |-----------------|------|-----------------------------------------------------------|
//! | `T+0x08`        | 4    | padding                                                   |
//! | `H = T+0x0C`    | 4    | offset of the game id and name from `H`, 0 when absent    |
//! | `H+0x04`        | 4    | number of records                                         |
//! | `H+0x08`        | 16n  | records                                                   |
//!
//! Each record at `R` holds the absolute offset of the first line, the number of lines, the
//! name delta (name at `R + 4 + delta`) and the comment delta (comment at `R + 4 + delta`,
//! absent when that is not past the record). Strings are NUL terminated UTF-8; the name
//! carries the author as `name [author]`.
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::{decode, decode_into, GctTable, TableEntry};
pub use write::{encode, GctWriter, GctWriterOptions};
