//! This library handles reading **XML code databases**.
//!
//! # Database Format Documentation
//!
//! A database is a read-only collection of codes for one game, meant to be browsed and copied
//! into a code list. Codes imported from a database start disabled.
//!
//! ```xml
//! <codes>
//!     <id>RMCP01</id>
//!     <category name="Items">
//!         <code name="Item Modifier" author="Bully" comment="Pick the item with X">
//!             <hex>
//!             C27BA164 00000002
//!             3800000X 907F0000
//!             </hex>
//!             <placeholder letter="X" type="1" comment="Item" args="Banana,Shell" recursive="0"/>
//!         </code>
//!     </category>
//!     <code name="Infinite Time" author="" comment="">
//!         <hex>042ABDF0 60000000</hex>
//!     </code>
//! </codes>
//! ```
//!
//! ## Elements
//!
//! | Element         | Attributes                                        | Meaning                                   |
//! |-----------------|---------------------------------------------------|-------------------------------------------|
//! | `<id>`          |                                                   | game id of the whole database             |
//! | `<category>`    | `name`                                            | a category, may nest                      |
//! | `<code>`        | `name`, `author`, `comment`                       | a code, its first child holds the payload |
//! | `<placeholder>` | `letter`, `type`, `comment`, `args`, `recursive`  | a value the user fills into the payload   |
//!
//! - Payload lines are trimmed of indentation and upper cased.
//! - `args` is a comma separated list, `recursive` is `1` or `0`.
//! - Entries keep document order, so top level codes may sit between categories.
//!

pub mod error;
pub mod read;

pub use read::{decode, decode_into};
