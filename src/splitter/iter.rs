//! Pull-based streaming mode.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};
use fallible_iterator::FallibleIterator;

use super::scan::ScanState;
use super::{Error, OffsetString};

/// Lazy statement sequence over a byte stream.
///
/// Each `next()` reads only the lines needed to assemble one statement
/// (or reach end of stream), so memory stays bounded by the longest
/// single statement regardless of script size. The stream must be UTF-8
/// (wrap it in a [`DecodingReader`] via
/// [`SqlSplitter::iterate_with_encoding`](super::SqlSplitter::iterate_with_encoding)
/// otherwise); invalid bytes surface as an [`Error::Io`] with kind
/// `InvalidData`.
///
/// Built by [`SqlSplitter::iterate`](super::SqlSplitter::iterate), which
/// consumes the splitter: the scan state has a single writer for the
/// whole life of the stream.
pub struct SqlStatementIterator<R: Read> {
    reader: BufReader<R>,
    state: ScanState,
    /// statements assembled but not yet handed out
    holder: VecDeque<OffsetString>,
    /// reused line buffer
    line: String,
    /// byte offset of the next line in the stream
    offset: usize,
    iterated_bytes: u64,
    done: bool,
}

impl<R: Read> SqlStatementIterator<R> {
    pub(crate) fn new(state: ScanState, input: R) -> Self {
        Self {
            reader: BufReader::new(input),
            state,
            holder: VecDeque::new(),
            line: String::new(),
            offset: 0,
            iterated_bytes: 0,
            done: false,
        }
    }

    /// Bytes consumed from the stream so far. Monotonic; can exceed the
    /// total emitted text length when comments/whitespace are stripped.
    pub fn iterated_bytes(&self) -> u64 {
        self.iterated_bytes
    }

    /// Whether another statement is available. May read ahead.
    pub fn has_next(&mut self) -> Result<bool, Error> {
        self.fill()?;
        Ok(!self.holder.is_empty())
    }

    /// The delimiter currently in effect (a `delimiter <token>` directive
    /// in the stream mutates it).
    pub fn delimiter(&self) -> &str {
        self.state.delimiter()
    }

    fn fill(&mut self) -> Result<(), Error> {
        while self.holder.is_empty() && !self.done {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line)?;
            let mut out = Vec::new();
            if read == 0 {
                self.done = true;
                self.state.finish(&mut out);
            } else {
                self.iterated_bytes += read as u64;
                let line_offset = self.offset;
                self.offset += read;
                let line = self.line.strip_suffix('\n').unwrap_or(&self.line);
                let line = line.strip_suffix('\r').unwrap_or(line);
                self.state.add_line(&mut out, line, line_offset);
            }
            self.holder.extend(out);
        }
        Ok(())
    }
}

/// Adapts a byte stream in a caller-chosen character encoding into the
/// UTF-8 the splitter scans.
///
/// Built by
/// [`SqlSplitter::iterate_with_encoding`](super::SqlSplitter::iterate_with_encoding).
/// Byte sequences that do not match the encoding surface as an
/// `InvalidData` I/O error.
pub struct DecodingReader<R: Read> {
    input: R,
    decoder: Decoder,
    /// raw chunk buffer; `start..end` is not yet decoded
    raw: Vec<u8>,
    start: usize,
    end: usize,
    eof: bool,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    pub(crate) fn new(input: R, encoding: &'static Encoding) -> Self {
        Self {
            input,
            decoder: encoding.new_decoder(),
            raw: vec![0; 4096],
            start: 0,
            end: 0,
            eof: false,
            finished: false,
        }
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.start == self.end && !self.eof {
                self.start = 0;
                self.end = self.input.read(&mut self.raw)?;
                self.eof = self.end == 0;
            }
            let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(
                &self.raw[self.start..self.end],
                buf,
                self.eof,
            );
            self.start += read;
            match result {
                DecoderResult::Malformed(..) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "byte sequence does not match the input encoding",
                    ));
                }
                DecoderResult::InputEmpty => {
                    if self.eof {
                        self.finished = true;
                    }
                    if written > 0 || self.finished {
                        return Ok(written);
                    }
                    // a partial sequence straddles the chunk: pull more input
                }
                DecoderResult::OutputFull => return Ok(written),
            }
        }
    }
}

impl<R: Read> FallibleIterator for SqlStatementIterator<R> {
    type Item = OffsetString;
    type Error = Error;

    fn next(&mut self) -> Result<Option<OffsetString>, Error> {
        self.fill()?;
        Ok(self.holder.pop_front())
    }
}
