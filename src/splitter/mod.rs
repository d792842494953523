//! Statement splitting: bulk and streaming modes.

use std::fmt;
use std::io::Read;

use encoding_rs::Encoding;
use memchr::memchr;

use crate::dialect::Dialect;

mod error;
mod iter;
mod nesting;
mod scan;
#[cfg(test)]
mod test;

pub use error::Error;
pub use iter::{DecodingReader, SqlStatementIterator};

use scan::{ScanState, DEFAULT_DELIMITER};

bitflags::bitflags! {
    /// What the splitter keeps besides the statements themselves.
    /// Hints and conditional blocks are always kept, whatever the flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Preserve: u8 {
        /// Keep each statement's leading whitespace.
        const FORMAT = 1;
        /// Keep `--` (and MySQL `#`) line comments.
        const SINGLE_COMMENTS = 1 << 1;
        /// Keep `/* ... */` block comments.
        const MULTI_COMMENTS = 1 << 2;
    }
}

/// One emitted statement and its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetString {
    offset: usize,
    pub(crate) text: String,
}

impl OffsetString {
    pub(crate) fn new(offset: usize, text: String) -> Self {
        Self { offset, text }
    }

    /// Byte offset of the statement's first retained character in the
    /// original source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The statement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume into the statement text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for OffsetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Dialect-aware SQL script splitter.
///
/// One instance is one splitting session: the active delimiter survives
/// across repeated [`split`](Self::split) calls (an in-script
/// `delimiter <token>` directive mutates it), while quote/comment/nesting
/// sub-state is reset at the start of each call. Not meant to be shared
/// between threads; `&mut self` keeps the single writer honest.
pub struct SqlSplitter {
    state: ScanState,
}

impl SqlSplitter {
    /// Splitter with the default `";"` delimiter and nothing preserved.
    pub fn new(dialect: Dialect) -> Result<Self, Error> {
        Self::with_options(dialect, DEFAULT_DELIMITER, Preserve::empty())
    }

    /// Splitter with an explicit initial delimiter and preservation flags.
    ///
    /// Fails with [`Error::UnsupportedDialect`] when the dialect has no
    /// splitting support, so a misconfiguration surfaces here and never
    /// mid-scan.
    pub fn with_options(
        dialect: Dialect,
        delimiter: &str,
        preserve: Preserve,
    ) -> Result<Self, Error> {
        let profile = dialect
            .profile()
            .ok_or(Error::UnsupportedDialect(dialect))?;
        Ok(Self {
            state: ScanState::new(profile, delimiter.to_owned(), preserve),
        })
    }

    /// The delimiter currently in effect.
    pub fn delimiter(&self) -> &str {
        self.state.delimiter()
    }

    /// Replace the active delimiter.
    pub fn set_delimiter(&mut self, delimiter: &str) {
        self.state.set_delimiter(delimiter);
    }

    /// Current preservation flags.
    pub fn preserve(&self) -> Preserve {
        self.state.preserve()
    }

    /// Replace the preservation flags.
    pub fn set_preserve(&mut self, preserve: Preserve) {
        self.state.set_preserve(preserve);
    }

    /// Split a whole script, returning the statements in source order.
    ///
    /// A blank script yields no statements. A non-blank tail without a
    /// trailing delimiter is emitted as the last statement.
    pub fn split(&mut self, script: &str) -> Vec<OffsetString> {
        let mut stmts = Vec::new();
        if script.trim().is_empty() {
            return stmts;
        }
        self.state.reset();
        let bytes = script.as_bytes();
        let mut start = 0;
        loop {
            match memchr(b'\n', &bytes[start..]) {
                Some(i) => {
                    let mut line = &script[start..start + i];
                    line = line.strip_suffix('\r').unwrap_or(line);
                    self.state.add_line(&mut stmts, line, start);
                    start += i + 1;
                }
                None => {
                    if start < bytes.len() {
                        self.state.add_line(&mut stmts, &script[start..], start);
                    }
                    break;
                }
            }
        }
        self.state.finish(&mut stmts);
        stmts
    }

    /// Stream statements from `input` instead of buffering the script.
    ///
    /// Consumes the splitter; delimiter and preservation flags carry over
    /// into the stream.
    pub fn iterate<R: Read>(self, input: R) -> SqlStatementIterator<R> {
        SqlStatementIterator::new(self.state, input)
    }

    /// Stream statements from `input`, decoding it from `encoding` first.
    ///
    /// Statement offsets and
    /// [`iterated_bytes`](SqlStatementIterator::iterated_bytes) are
    /// measured over the decoded UTF-8 text, not the raw stream. Byte
    /// sequences that do not match the encoding surface as an
    /// [`Error::Io`] with kind `InvalidData`.
    pub fn iterate_with_encoding<R: Read>(
        self,
        input: R,
        encoding: &'static Encoding,
    ) -> SqlStatementIterator<DecodingReader<R>> {
        SqlStatementIterator::new(self.state, DecodingReader::new(input, encoding))
    }
}
