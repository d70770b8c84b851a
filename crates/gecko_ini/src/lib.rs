//! This library handles reading from and creating **Dolphin INI code lists**.
//!
//! # INI Format Documentation
//!
//! Dolphin keeps the codes of a game in `<game id>.ini`, next to every other per-game setting.
//! Only two sections are of interest to this library:
//!
//! ```text
//! [Gecko]
//! $Always Bullet Bill [Bully]
//! c27ba164 00000003
//! 3800000d 907f0000
//! *Every item box gives a bullet bill.
//! $Infinite Time
//! 042abdf0 60000000
//! *
//! [Gecko_Enabled]
//! $Always Bullet Bill
//! ```
//!
//! ## `[Gecko]` lines
//!
//! | Line                   | Meaning                                                  |
//! |------------------------|----------------------------------------------------------|
//! | `$name` / `$name [a]`  | starts a new code, optionally crediting an author        |
//! | `*text`                | a comment line, a bare `*` carries nothing               |
//! | anything else          | a payload line of the current code                       |
//!
//! ## `[Gecko_Enabled]` lines
//!
//! A code is enabled when a line reading exactly `$name` (without the author) is present.
//!
//! ## Other content
//!
//! Both sections end at the next line starting with `[`. Everything else in the file is kept
//! in [`gecko_list::CodeList::scrap`] so that it can be written back out.
//!

pub mod error;
pub mod read;
pub mod write;

pub use read::{decode, decode_into, decode_path};
pub use write::{encode, IniWriterOptions};
