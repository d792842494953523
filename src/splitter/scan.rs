//! Line-oriented splitting automaton.
//!
//! One [`ScanState`] per splitting session. The session feeds it one line
//! at a time (without the trailing newline) together with the line's byte
//! offset in the source; complete statements are appended to the caller's
//! output as they are recognized. All markers of interest are ASCII, so
//! scanning is byte-indexed and safe on UTF-8 input.

use log::debug;

use crate::dialect::{is_word_byte, DialectProfile, EscapeStyle};

use super::nesting::BlockTracker;
use super::{OffsetString, Preserve};

pub(crate) const DEFAULT_DELIMITER: &str = ";";

const DELIMITER_DIRECTIVE: &[u8] = b"delimiter ";

/// Hint/conditional sub-state, orthogonal to the comment/string states:
/// hint and conditional bodies are scanned and retained as normal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    None,
    /// `--+ ...` to end of line; suppresses delimiter matching
    Line,
    /// `/*+ ... */`; suppresses delimiter matching
    Block,
    /// `/*! ... */` (MySQL family); delimiters inside still count
    Conditional,
}

#[derive(Debug)]
pub(crate) struct ScanState {
    profile: &'static DialectProfile,
    delimiter: String,
    preserve: Preserve,
    /// open quote byte, if inside a string/quoted identifier
    in_string: Option<u8>,
    /// Q-quote pairing byte recorded at `q'<`, `q'[`, ...
    q_close: Option<u8>,
    in_block_comment: bool,
    hint: Hint,
    /// non-space statement text seen since the last flush
    in_normal_sql: bool,
    tracker: BlockTracker,
    /// pending (incomplete) statement
    buffer: Vec<u8>,
    /// offset of the first byte placed in `buffer` since the last flush
    buffer_offset: usize,
}

impl ScanState {
    pub(crate) fn new(
        profile: &'static DialectProfile,
        delimiter: String,
        preserve: Preserve,
    ) -> Self {
        Self {
            profile,
            delimiter,
            preserve,
            in_string: None,
            q_close: None,
            in_block_comment: false,
            hint: Hint::None,
            in_normal_sql: false,
            tracker: BlockTracker::new(profile),
            buffer: Vec::new(),
            buffer_offset: 0,
        }
    }

    /// Reset quote/comment/nesting sub-state and drop any pending text.
    /// The delimiter and preserve flags survive.
    pub(crate) fn reset(&mut self) {
        self.in_string = None;
        self.q_close = None;
        self.in_block_comment = false;
        self.hint = Hint::None;
        self.in_normal_sql = false;
        self.tracker.reset();
        self.buffer.clear();
    }

    pub(crate) fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub(crate) fn set_delimiter(&mut self, delimiter: &str) {
        delimiter.clone_into(&mut self.delimiter);
    }

    pub(crate) fn preserve(&self) -> Preserve {
        self.preserve
    }

    pub(crate) fn set_preserve(&mut self, preserve: Preserve) {
        self.preserve = preserve;
    }

    /// Scan one line (no trailing newline) starting at byte `line_offset`
    /// of the source, appending any completed statements to `stmts`.
    pub(crate) fn add_line(
        &mut self,
        stmts: &mut Vec<OffsetString>,
        line: &str,
        line_offset: usize,
    ) {
        // SQL*Plus-style terminator: a lone `/` line ends a PL object that
        // the default `;` delimiter cannot (see BlockTracker), and recovers
        // from bodies the tracker could not balance.
        if self.in_string.is_none()
            && !self.in_block_comment
            && self.tracker.in_pl_object()
            && self.delimiter == DEFAULT_DELIMITER
            && line.trim() == "/"
        {
            self.emit(stmts);
            return;
        }

        let bytes = line.as_bytes();
        let mut scratch: Vec<u8> = Vec::with_capacity(bytes.len() + 1);
        let mut scratch_start = line_offset;
        let mut boundary_on_line = false;
        let mut pos = 0;

        while pos < bytes.len() {
            let b = bytes[pos];
            let normal = self.in_string.is_none() && !self.in_block_comment;

            // indentation before a fresh statement
            if matches!(b, b' ' | b'\t' | b'\r')
                && scratch.is_empty()
                && self.buffer.is_empty()
                && !self.preserve.contains(Preserve::FORMAT)
            {
                pos += 1;
                continue;
            }

            if self.profile.pl_blocks && normal && !is_word_byte(b) {
                self.tracker.end_word(b);
            }

            // `delimiter <token>` directive
            if normal && is_directive(&scratch) {
                let mut token = Vec::new();
                while pos < bytes.len() {
                    let c = bytes[pos];
                    if c != b' ' {
                        token.push(c);
                    } else if !token.is_empty() {
                        break;
                    }
                    pos += 1;
                }
                scratch.clear();
                if !token.is_empty() {
                    self.delimiter = String::from_utf8_lossy(&token).into_owned();
                    debug!(target: "splitter", "delimiter changed to {:?}", self.delimiter);
                }
                continue;
            }

            // backslash escape (MySQL family), inert inside backtick identifiers
            if self.profile.escape == EscapeStyle::Backslash
                && !self.in_block_comment
                && b == b'\\'
                && self.in_string != Some(b'`')
            {
                if pos + 1 >= bytes.len() {
                    break; // nothing left on this line to escape
                }
                push_scratch(&mut scratch, &mut scratch_start, line_offset + pos, b'\\');
                scratch.push(bytes[pos + 1]);
                pos += 2;
                continue;
            }

            // active delimiter
            if normal
                && !matches!(self.hint, Hint::Line | Hint::Block)
                && self.delimiter_at(bytes, pos)
            {
                if self.profile.pl_blocks && is_word_byte(b) {
                    self.tracker.end_word(b);
                }
                if self.tracker.depth() == 0
                    && !(self.tracker.in_pl_object() && self.delimiter == DEFAULT_DELIMITER)
                {
                    pos += self.delimiter.len();
                    self.flush_scratch(&mut scratch, scratch_start);
                    self.emit(stmts);
                    boundary_on_line = true;
                    continue;
                }
                // interior delimiter inside a PL body: ordinary text
            }

            if normal && self.line_comment_at(bytes, pos) {
                self.flush_scratch(&mut scratch, scratch_start);
                if self.preserve.contains(Preserve::SINGLE_COMMENTS) {
                    self.keep_line_comment(
                        stmts,
                        &bytes[pos..],
                        line_offset + pos,
                        boundary_on_line,
                    );
                }
                // otherwise the comment (and its line) is dropped
                break;
            }

            if normal && self.block_comment_start_at(bytes, pos) {
                if self.preserve.contains(Preserve::MULTI_COMMENTS) {
                    push_scratch(&mut scratch, &mut scratch_start, line_offset + pos, b'/');
                    scratch.push(b'*');
                }
                self.in_block_comment = true;
                pos += 2;
                continue;
            }

            if self.in_block_comment
                && self.hint == Hint::None
                && b == b'*'
                && bytes.get(pos + 1) == Some(&b'/')
            {
                self.in_block_comment = false;
                pos += 2;
                self.flush_scratch(&mut scratch, scratch_start);
                if self.preserve.contains(Preserve::MULTI_COMMENTS) {
                    if self.buffer.is_empty() {
                        self.buffer_offset = line_offset + pos - 2;
                    }
                    self.buffer.extend_from_slice(b"*/");
                    if !self.in_normal_sql {
                        if let Some(last) = stmts.last_mut() {
                            // trailing comment: glue it to the statement it follows
                            last.text.push_str(&String::from_utf8_lossy(&self.buffer));
                            self.buffer.clear();
                        }
                    }
                }
                continue;
            }

            // ordinary byte: hint and quote transitions, then retention
            if self.in_string.is_none() {
                if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
                    let marker = bytes.get(pos + 2);
                    if self.profile.conditional_comments && marker == Some(&b'!') {
                        self.hint = Hint::Conditional;
                    } else if marker == Some(&b'+') {
                        self.hint = Hint::Block;
                    }
                } else if self.hint != Hint::None && b == b'*' && bytes.get(pos + 1) == Some(&b'/')
                {
                    self.hint = Hint::None;
                } else if self.profile.line_hints
                    && b == b'-'
                    && bytes.get(pos + 1) == Some(&b'-')
                    && bytes.get(pos + 2) == Some(&b'+')
                {
                    self.hint = Hint::Line;
                }
            }

            match self.in_string {
                Some(quote) if b == quote => {
                    let closed = match self.q_close {
                        None => true,
                        Some(opener) => pos > 0 && bytes[pos - 1] == q_pair(opener),
                    };
                    if closed {
                        self.in_string = None;
                        self.q_close = None;
                    }
                }
                None if !self.in_block_comment
                    && !matches!(self.hint, Hint::Line | Hint::Block)
                    && matches!(b, b'\'' | b'"' | b'`') =>
                {
                    self.in_string = Some(b);
                    if self.profile.escape == EscapeStyle::QQuote
                        && b == b'\''
                        && pos > 0
                        && matches!(bytes[pos - 1], b'q' | b'Q')
                    {
                        self.q_close = bytes.get(pos + 1).copied();
                    }
                }
                _ => {}
            }

            if !self.in_block_comment {
                push_scratch(&mut scratch, &mut scratch_start, line_offset + pos, b);
                if b != b' ' {
                    self.in_normal_sql = true;
                }
                if self.profile.pl_blocks
                    && self.in_string.is_none()
                    && is_word_byte(b)
                {
                    self.tracker.push_byte(b);
                }
            } else if self.preserve.contains(Preserve::MULTI_COMMENTS) {
                push_scratch(&mut scratch, &mut scratch_start, line_offset + pos, b);
            }
            pos += 1;
        }

        // end of line
        if self.hint == Hint::Line {
            self.hint = Hint::None;
        }
        // a directive with no token: ignored, prior delimiter stays
        if self.in_string.is_none() && !self.in_block_comment && is_directive(&scratch) {
            scratch.clear();
        }
        if self.profile.pl_blocks && self.in_string.is_none() && !self.in_block_comment {
            self.tracker.end_word(b'\n');
        }
        if !scratch.is_empty() || !self.buffer.is_empty() {
            push_scratch(&mut scratch, &mut scratch_start, line_offset + bytes.len(), b'\n');
            self.flush_scratch(&mut scratch, scratch_start);
        }
    }

    /// End of input: flush a non-blank pending buffer as the last
    /// statement (trailing newlines stripped, no terminator appended) and
    /// reset the scan sub-state.
    pub(crate) fn finish(&mut self, stmts: &mut Vec<OffsetString>) {
        let mut text = String::from_utf8_lossy(&self.buffer).into_owned();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if !text.trim().is_empty() {
            debug!(target: "splitter", "trailing statement at offset {}", self.buffer_offset);
            stmts.push(OffsetString::new(self.buffer_offset, text));
        }
        self.reset();
    }

    /// Flush the pending buffer as one statement. The emitted text always
    /// carries a `;` terminator so each statement stays independently
    /// executable under a custom delimiter; blank buffers emit nothing.
    fn emit(&mut self, stmts: &mut Vec<OffsetString>) {
        let mut text = String::from_utf8_lossy(&self.buffer).into_owned();
        let end = text.trim_end().len();
        if end > 0 {
            if text.as_bytes()[end - 1] == b';' {
                text.truncate(end);
            } else {
                text.push(';');
            }
            debug!(target: "splitter", "statement at offset {}", self.buffer_offset);
            stmts.push(OffsetString::new(self.buffer_offset, text));
        }
        self.buffer.clear();
        self.in_normal_sql = false;
        self.tracker.reset();
    }

    fn flush_scratch(&mut self, scratch: &mut Vec<u8>, scratch_start: usize) {
        if scratch.is_empty() {
            return;
        }
        if self.buffer.is_empty() {
            self.buffer_offset = scratch_start;
        }
        self.buffer.extend_from_slice(scratch);
        scratch.clear();
    }

    /// A preserved line comment: reattach it to the previous statement
    /// when the pending buffer holds no statement text, else keep it in
    /// the buffer.
    fn keep_line_comment(
        &mut self,
        stmts: &mut Vec<OffsetString>,
        comment: &[u8],
        offset: usize,
        same_line: bool,
    ) {
        let only_spaces = self.buffer.iter().all(|&b| b == b' ');
        match stmts.last_mut() {
            Some(last) if only_spaces => {
                if !same_line {
                    last.text.push('\n');
                }
                last.text.push_str(&String::from_utf8_lossy(&self.buffer));
                self.buffer.clear();
                last.text.push_str(&String::from_utf8_lossy(comment));
                last.text.push('\n');
            }
            _ => {
                if self.buffer.is_empty() {
                    self.buffer_offset = offset;
                }
                self.buffer.extend_from_slice(comment);
                // the end-of-line flush appends the newline
            }
        }
    }

    fn delimiter_at(&self, bytes: &[u8], pos: usize) -> bool {
        let d = self.delimiter.as_bytes();
        if d.is_empty() || !bytes[pos..].starts_with(d) {
            return false;
        }
        // a `/` delimiter never matches against a comment token
        if d == b"/" && (bytes.get(pos + 1) == Some(&b'*') || (pos > 0 && bytes[pos - 1] == b'*'))
        {
            return false;
        }
        // Q-quote opener wins over a colliding quote delimiter
        if d[0] == b'\''
            && self.profile.escape == EscapeStyle::QQuote
            && pos > 0
            && matches!(bytes[pos - 1], b'q' | b'Q')
        {
            return false;
        }
        true
    }

    fn line_comment_at(&self, bytes: &[u8], pos: usize) -> bool {
        if self.profile.hash_comments && bytes[pos] == b'#' {
            return true;
        }
        if bytes[pos] != b'-' || bytes.get(pos + 1) != Some(&b'-') {
            return false;
        }
        if self.profile.dash_comment_needs_gap {
            matches!(bytes.get(pos + 2), None | Some(&b' '))
        } else if self.profile.line_hints {
            bytes.get(pos + 2) != Some(&b'+')
        } else {
            true
        }
    }

    fn block_comment_start_at(&self, bytes: &[u8], pos: usize) -> bool {
        if matches!(self.hint, Hint::Line | Hint::Block) {
            return false;
        }
        if bytes[pos] != b'/' || bytes.get(pos + 1) != Some(&b'*') {
            return false;
        }
        let marker = bytes.get(pos + 2);
        if marker == Some(&b'+') {
            return false; // optimizer hint
        }
        !(self.profile.conditional_comments && marker == Some(&b'!'))
    }
}

fn push_scratch(scratch: &mut Vec<u8>, start: &mut usize, offset: usize, b: u8) {
    if scratch.is_empty() {
        *start = offset;
    }
    scratch.push(b);
}

fn is_directive(scratch: &[u8]) -> bool {
    let mut s = scratch;
    while let [b' ' | b'\t', rest @ ..] = s {
        s = rest;
    }
    s.eq_ignore_ascii_case(DELIMITER_DIRECTIVE)
}

fn q_pair(opener: u8) -> u8 {
    match opener {
        b'<' => b'>',
        b'{' => b'}',
        b'[' => b']',
        b'(' => b')',
        _ => opener,
    }
}
