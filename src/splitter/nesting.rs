//! PL block nesting over the normal-context word stream.

use crate::dialect::{block_keyword, BlockKeyword, DialectProfile, MAX_BLOCK_KEYWORD_LEN};

/// Tracks PL block depth so delimiters inside `BEGIN ... END` bodies are
/// not taken for script-level statement boundaries.
///
/// Fed one word at a time: the scanner pushes identifier bytes from
/// normal-context text only (never string, comment or hint-marker bytes)
/// and calls [`end_word`](Self::end_word) with the byte that terminated
/// the word. Words longer than any keyword are kept truncated; they can
/// never match the table.
#[derive(Debug)]
pub(crate) struct BlockTracker {
    enabled: bool,
    anonymous_blocks: bool,
    while_blocks: bool,
    depth: u32,
    word: Vec<u8>,
    /// current word follows a `.` and is a qualified member, never a keyword
    dotted: bool,
    /// `CREATE` seen at depth 0, object keyword expected
    create_header: bool,
    /// the next `BEGIN` belongs to the current header/declaration
    body_pending: bool,
    /// `IF` seen, `EXISTS` would cancel it
    if_pending: bool,
    /// `END` seen, an `IF`/`LOOP`/`CASE`/`WHILE`/`REPEAT` closer may follow
    after_end: bool,
    pl_object: bool,
}

impl BlockTracker {
    pub(crate) fn new(profile: &DialectProfile) -> Self {
        Self {
            enabled: profile.pl_blocks,
            anonymous_blocks: profile.anonymous_blocks,
            while_blocks: profile.while_blocks,
            depth: 0,
            word: Vec::with_capacity(MAX_BLOCK_KEYWORD_LEN + 1),
            dotted: false,
            create_header: false,
            body_pending: false,
            if_pending: false,
            after_end: false,
            pl_object: false,
        }
    }

    /// Statement boundary: forget everything.
    pub(crate) fn reset(&mut self) {
        self.depth = 0;
        self.word.clear();
        self.dotted = false;
        self.create_header = false;
        self.body_pending = false;
        self.if_pending = false;
        self.after_end = false;
        self.pl_object = false;
    }

    pub(crate) fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the current statement is a PL object or anonymous block.
    pub(crate) fn in_pl_object(&self) -> bool {
        self.pl_object
    }

    pub(crate) fn push_byte(&mut self, b: u8) {
        if self.enabled && self.word.len() <= MAX_BLOCK_KEYWORD_LEN {
            self.word.push(b);
        }
    }

    /// The pending word (if any) is complete; `terminator` is the byte
    /// that ended it.
    pub(crate) fn end_word(&mut self, terminator: u8) {
        if !self.enabled {
            return;
        }
        if self.word.is_empty() {
            if terminator == b'.' {
                self.dotted = true;
            }
            return;
        }
        let kw = if self.dotted {
            None
        } else {
            block_keyword(&self.word)
        };
        self.word.clear();
        self.dotted = terminator == b'.';

        if self.if_pending {
            if kw == Some(BlockKeyword::Not) {
                return; // IF NOT ...: still undecided
            }
            self.if_pending = false;
            if kw == Some(BlockKeyword::Exists) {
                return; // IF [NOT] EXISTS clause, no block
            }
            self.depth += 1; // the IF opened a block after all
        }
        if self.after_end {
            self.after_end = false;
            if matches!(
                kw,
                Some(
                    BlockKeyword::If
                        | BlockKeyword::Loop
                        | BlockKeyword::Case
                        | BlockKeyword::While
                        | BlockKeyword::Repeat
                )
            ) {
                return; // END IF / END LOOP / ...: already counted
            }
        }
        let Some(kw) = kw else {
            self.create_header = false;
            return;
        };
        match kw {
            BlockKeyword::Create => {
                if self.depth == 0 {
                    self.create_header = true;
                }
            }
            // modifiers between CREATE and the object keyword
            BlockKeyword::Or
            | BlockKeyword::Replace
            | BlockKeyword::Definer
            | BlockKeyword::Editionable
            | BlockKeyword::Noneditionable => {}
            BlockKeyword::Function
            | BlockKeyword::Procedure
            | BlockKeyword::Package
            | BlockKeyword::Type
            | BlockKeyword::Trigger => {
                if self.create_header {
                    self.create_header = false;
                    self.depth += 1;
                    self.body_pending = true;
                    self.pl_object = true;
                } else if self.depth > 0
                    && matches!(kw, BlockKeyword::Function | BlockKeyword::Procedure)
                {
                    // nested subprogram declaration; its BEGIN belongs to it
                    self.body_pending = true;
                }
            }
            BlockKeyword::Body => {} // PACKAGE BODY / TYPE BODY
            BlockKeyword::Begin => {
                if self.body_pending {
                    self.body_pending = false;
                } else if self.depth > 0 {
                    self.depth += 1;
                } else if self.anonymous_blocks {
                    self.depth = 1;
                    self.pl_object = true;
                }
                // otherwise a top-level BEGIN starts a transaction
            }
            BlockKeyword::Declare => {
                if self.depth == 0 && self.anonymous_blocks {
                    self.depth = 1;
                    self.body_pending = true;
                    self.pl_object = true;
                }
            }
            BlockKeyword::Case | BlockKeyword::Loop => {
                if self.depth > 0 {
                    self.depth += 1;
                }
            }
            BlockKeyword::If => {
                // IF( is a function call, IF <cond> opens a block
                if self.depth > 0 && terminator != b'(' {
                    self.if_pending = true;
                }
            }
            BlockKeyword::While | BlockKeyword::Repeat => {
                // Oracle WHILE/FOR headers are carried by their LOOP keyword
                if self.depth > 0 && self.while_blocks {
                    self.depth += 1;
                }
            }
            BlockKeyword::End => {
                self.depth = self.depth.saturating_sub(1);
                self.after_end = true;
            }
            BlockKeyword::Exists | BlockKeyword::Not => {}
        }
    }
}
