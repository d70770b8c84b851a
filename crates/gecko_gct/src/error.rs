//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`gecko_list::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    ListError(#[from] gecko_list::error::Error),

    /// The data does not start with `00D0C0DE 00D0C0DE`
    #[error("file is not a gecko code table, the magic is missing")]
    InvalidMagic,

    /// No `F0000000 00000000` line was found
    #[error("gecko code table has no terminator")]
    MissingTerminator,

    /// The trailing index of an extended table is inconsistent
    #[error("invalid extended index: {0}")]
    #[diagnostic(help("the table can still be read as a classic table by removing the index"))]
    InvalidIndex(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
