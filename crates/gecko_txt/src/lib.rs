//! This library handles reading from and creating **text code lists**.
//!
//! # TXT Format Documentation
//!
//! The text format is the human readable way of sharing a code list. It is a sequence of
//! *blocks* separated by a single blank line. Line breaks may be `\r\n` or `\n`; files are read
//! as UTF-8 and fall back to Windows-1252 when they are not valid UTF-8.
//!
//! ## Header Block
//!
//! When the first line of the file is a game id (4 to 6 alphanumeric characters) and the block
//! holds no payload lines, the first block is the header. It is always written, with `UNKW00`
//! standing in for an unknown game:
//!
//! ```text
//! RMCP01
//! Mario Kart Wii (PAL)
//! ```
//!
//! ## Code Blocks
//!
//! | Line                         | Meaning                                              |
//! |------------------------------|------------------------------------------------------|
//! | first non-code line          | the code name, optionally followed by ` [author]`    |
//! | `XXXXXXXX XXXXXXXX`          | a payload line                                       |
//! | `* XXXXXXXX XXXXXXXX`        | a payload line, marking the code as enabled          |
//! | any other line               | part of the comment                                  |
//!
//! ## Categories
//!
//! A block without payload lines opens a category. Nested categories are marked with one `#`
//! per level, and a block holding nothing but the same number of `#` closes the category:
//!
//! ```text
//! #Items
//!
//! ##Karts
//!
//! Fast Kart
//! 04000000 00000001
//!
//! ##
//!
//! #
//! ```
//!
//! A category name without any `#` (as written by older tools) always opens a top level
//! category.
//!

pub mod error;
pub mod read;
pub mod write;

pub use read::{decode, decode_into};
pub use write::{encode, LineEnding, TxtWriterOptions};
