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

    /// Transparent warpper for [`gecko_gct::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    GctError(#[from] gecko_gct::error::Error),

    /// No candidate section holds a code table
    #[error("no code table was found in the executable")]
    #[diagnostic(help("codes can only be read from a DOL that already had a code handler and table injected"))]
    EmptyImage,

    /// The new table does not fit where the old one was
    #[error("code table needs {needed} bytes but only {available} are available")]
    TableTooLarge { needed: usize, available: usize },
}

impl From<gecko_list::error::Error> for Error {
    fn from(value: gecko_list::error::Error) -> Self {
        Self::GctError(value.into())
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
