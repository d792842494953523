use std::error;
use std::fmt;
use std::io;

use crate::dialect::Dialect;

/// Splitter errors.
///
/// The splitter is lexical, not semantic: malformed SQL is never an
/// error (unterminated quotes/comments flush best-effort at EOF), so the
/// failure modes reduce to configuration and I/O.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// I/O Error
    Io(io::Error),
    /// No splitting support for the requested dialect
    UnsupportedDialect(Dialect),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(ref err) => err.fmt(f),
            Self::UnsupportedDialect(dialect) => {
                write!(f, "unsupported dialect: {dialect:?}")
            }
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
