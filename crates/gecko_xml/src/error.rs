//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// The database is not well formed XML
    #[error("malformed database at byte {position}: {source}")]
    #[diagnostic(help("databases are XML documents with <category> and <code> elements"))]
    XmlError {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Transparent warpper for [`gecko_list::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    ListError(#[from] gecko_list::error::Error),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
