//! SQL script statement splitter.
//!
//! Decomposes a script containing one or more SQL / PL statements into
//! individual statement texts with their source byte offsets, honoring
//! dialect-specific comment, string and escape conventions, the in-script
//! `delimiter <token>` directive, and PL block nesting.
//!
//! ```
//! use sql_splitter::{Dialect, SqlSplitter};
//!
//! let mut splitter = SqlSplitter::new(Dialect::Oracle)?;
//! let stmts = splitter.split("select 1 from dual; select 2 from dual;");
//! assert_eq!(stmts.len(), 2);
//! assert_eq!(stmts[1].text(), "select 2 from dual;");
//! # Ok::<(), sql_splitter::Error>(())
//! ```
#![warn(missing_docs)]
#![warn(clippy::large_stack_frames)]

pub mod dialect;
pub mod splitter;

pub use dialect::Dialect;
pub use splitter::{
    DecodingReader, Error, OffsetString, Preserve, SqlSplitter, SqlStatementIterator,
};
