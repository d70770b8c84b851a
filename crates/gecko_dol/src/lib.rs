//! This library finds and replaces **Gecko code tables embedded in DOL executables**.
//!
//! # DOL Format Documentation
//!
//! A DOL starts with a fixed `0x100` byte header describing up to 7 text and 11 data
//! sections. All integers are big endian.
//!
//! | Offset  | Size   | Content                        |
//! |---------|--------|--------------------------------|
//! | `0x00`  | 7 * 4  | text section file offsets      |
//! | `0x1C`  | 11 * 4 | data section file offsets      |
//! | `0x48`  | 7 * 4  | text section load addresses    |
//! | `0x64`  | 11 * 4 | data section load addresses    |
//! | `0x90`  | 7 * 4  | text section sizes             |
//! | `0xAC`  | 11 * 4 | data section sizes             |
//! | `0xD8`  | 4      | bss load address               |
//! | `0xDC`  | 4      | bss size                       |
//! | `0xE0`  | 4      | entry point                    |
//!
//! ## Embedded Tables
//!
//! Injection tools place the code handler followed by a classic code table in a text
//! section loaded either at the entry point or at `0x80001800`. Such sections are searched
//! line by line for the table magic, then for its terminator. Only the first table found is
//! used.
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::{decode, decode_into, DolImage, EmbeddedTable};
pub use write::{patch, PatchOptions};
