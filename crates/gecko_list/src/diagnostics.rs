//! Events reported by the codecs and the decisions callers make about them.
//!
//! Codecs never prompt. Anything a front end may want to show is recorded as an [`Event`]
//! and returned in [`Diagnostics`]; anything that needs a decision before work continues is
//! answered up front with a policy.

use derive_more::derive::{Display, IntoIterator};

use crate::error::describe;

/// Something worth telling the user about a decode or encode call
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Event {
    /// The imported data names another game than the list it was imported into
    #[display("game id {detected} does not match {current}, keeping {current}")]
    GameIdMismatch { current: String, detected: String },

    /// A code line is not of the form `XXXXXXXX XXXXXXXX`
    #[display("invalid character {} in code \"{code}\" on line {line}", describe(character))]
    InvalidCharacter {
        code: String,
        line: usize,
        character: Option<char>,
    },

    /// The table ended before the code got all of its lines
    #[display("code \"{code}\" is cut short by the end of the table")]
    UnterminatedCode { code: String },

    /// A line that does not belong to any code
    #[display("line {line} does not belong to any code: {text}")]
    OrphanLine { line: usize, text: String },

    /// An enabled entry matched more than one code
    #[display("\"{name}\" matches more than one code")]
    AmbiguousName { name: String },

    /// The data after a table terminator was not a usable index
    #[display("extended index ignored: {reason}")]
    IndexIgnored { reason: String },
}

/// Ordered list of events produced by a single call
#[derive(Debug, Default, Clone, PartialEq, Eq, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct Diagnostics(Vec<Event>);

impl Diagnostics {
    /// An empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, logging it as a warning.
    pub fn push(&mut self, event: Event) {
        tracing::warn!("{}", event);
        self.0.push(event);
    }

    /// Append the events of another call.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded events
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }
}

/// What to do when imported data names a different game
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Stop before the list is touched
    #[default]
    Abort,
    /// Keep the current game id and import anyway
    Continue,
}

/// What to do when a code line cannot be encoded
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum InvalidCodePolicy {
    /// Stop and discard everything written so far
    #[default]
    Abort,
    /// Drop the rest of the offending code and carry on with the next one
    Truncate,
}
