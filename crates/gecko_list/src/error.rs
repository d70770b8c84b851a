//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NodeId;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Hex text that could not be turned into bytes
    #[error("malformed hex at position {position}: {}", describe(.character))]
    MalformedHex {
        /// Offset of the offending character once whitespace is removed
        position: usize,
        /// The offending character, `None` when the digit count is odd
        character: Option<char>,
    },

    /// A code line that is not of the form `XXXXXXXX XXXXXXXX`
    #[error("invalid character {} in code \"{code}\" on line {line}", describe(.character))]
    InvalidCharacter {
        /// Name of the code holding the line
        code: String,
        /// 1-based line number inside the code
        line: usize,
        /// The offending character, `None` when the line ends early
        character: Option<char>,
    },

    /// Game ids are 4 to 6 alphanumeric characters
    #[error("\"{0}\" is not a valid game id")]
    InvalidGameId(String),

    /// The imported data belongs to a different game
    #[error("game id {detected} does not match the list's game id {current}")]
    #[diagnostic(help("import with the continue policy to keep the current game id"))]
    GameIdMismatch {
        /// Game id of the list being imported into
        current: String,
        /// Game id found in the imported data
        detected: String,
    },

    /// The node id was removed or never belonged to this list
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// Only categories can hold children
    #[error("node {0} is not a category")]
    NotACategory(NodeId),
}

pub(crate) fn describe(character: &Option<char>) -> String {
    match character {
        Some(c) => format!("'{}'", c),
        None => "end of line".into(),
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
