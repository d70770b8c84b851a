//! This library holds the in-memory model shared by the **Gecko code list** codecs.
//!
//! A code list is an ordered tree of *categories* and *codes* belonging to one game. Codes are
//! small patches made of 8 byte lines, each written as two 8 digit hex words:
//!
//! ```text
//! C2000000 00000001
//! 38600001 00000000
//! ```
//!
//! ## Model
//!
//! | Item          | Holds                                                             |
//! |---------------|-------------------------------------------------------------------|
//! | [`CodeList`]  | game id, game name, leftover INI text, the node arena             |
//! | [`CodeNode`]  | display name, parent, and either children or a [`Code`]           |
//! | [`Code`]      | payload ([`HexCode`]), comment, author, enabled flag, placeholders |
//! | [`NodeId`]    | stable handle into the arena, invalidated on removal              |
//!
//! - Categories never carry payload, comment, author or the enabled flag.
//! - Codes never have children.
//! - The game id is empty (unknown) or 4 to 6 alphanumeric characters.
//!
//! ## Diagnostics
//!
//! Codecs report what they could not do silently through [`Diagnostics`], and take
//! [`MismatchPolicy`] / [`InvalidCodePolicy`] values in place of interactive prompts.
//!

pub mod diagnostics;
pub mod error;
pub mod hex;
pub mod name;
#[cfg(feature = "serde")]
mod serde;
pub mod text;
pub mod types;

pub use diagnostics::{Diagnostics, Event, InvalidCodePolicy, MismatchPolicy};
pub use hex::HexCode;
pub use types::{Code, CodeList, CodeNode, NodeId, NodeKind, Placeholder};
