//! SQL dialect selection and lexical profiles.

use phf::phf_map;

/// Dialects the splitter can be configured for.
///
/// Variants map onto one of two lexical families (MySQL-like or
/// Oracle-like); the family decides comment markers, string escapes and
/// PL block rules. `Postgres` is recognized but has no splitting support
/// and is rejected at construction time.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL
    MySql,
    /// OceanBase in MySQL compatibility mode
    OceanBaseMySql,
    /// Apache Doris (MySQL wire compatible)
    Doris,
    /// Oracle
    Oracle,
    /// OceanBase in Oracle compatibility mode
    OceanBaseOracle,
    /// PostgreSQL (unsupported)
    Postgres,
}

impl Dialect {
    /// Lexical profile of this dialect, `None` when unsupported.
    pub(crate) fn profile(self) -> Option<&'static DialectProfile> {
        match self {
            Self::MySql | Self::OceanBaseMySql | Self::Doris => Some(&MYSQL),
            Self::Oracle | Self::OceanBaseOracle => Some(&ORACLE),
            Self::Postgres => None,
        }
    }
}

/// Escape convention inside string literals. Quote doubling (`''`) needs
/// no flag: a doubled quote reads as close-then-reopen in every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStyle {
    /// `\` consumes the next character literally (MySQL family).
    Backslash,
    /// `q'...'` / `Q'...'` alternative quoting with a paired closer (Oracle family).
    QQuote,
}

/// Immutable lexical rules of one dialect family.
#[derive(Debug)]
pub(crate) struct DialectProfile {
    /// `#` starts a line comment.
    pub(crate) hash_comments: bool,
    /// `--` is a line comment only when followed by a space or EOL.
    pub(crate) dash_comment_needs_gap: bool,
    /// `--+` starts a single-line optimizer hint, not a comment.
    pub(crate) line_hints: bool,
    /// `/*! ... */` is a conditional-execution block, not a comment.
    pub(crate) conditional_comments: bool,
    pub(crate) escape: EscapeStyle,
    /// PL block keywords feed the nesting tracker.
    pub(crate) pl_blocks: bool,
    /// Bare `BEGIN` / `DECLARE` at top level open an anonymous block.
    pub(crate) anonymous_blocks: bool,
    /// `WHILE` / `REPEAT` open a block (closed by `END WHILE` / `END REPEAT`).
    pub(crate) while_blocks: bool,
}

static MYSQL: DialectProfile = DialectProfile {
    hash_comments: true,
    dash_comment_needs_gap: true,
    line_hints: false,
    conditional_comments: true,
    escape: EscapeStyle::Backslash,
    pl_blocks: true,
    anonymous_blocks: false,
    while_blocks: true,
};

static ORACLE: DialectProfile = DialectProfile {
    hash_comments: false,
    dash_comment_needs_gap: false,
    line_hints: true,
    conditional_comments: false,
    escape: EscapeStyle::QQuote,
    pl_blocks: true,
    anonymous_blocks: true,
    while_blocks: false,
};

/// Keywords that open, close or qualify PL blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKeyword {
    Begin,
    Body,
    Case,
    Create,
    Declare,
    Definer,
    Editionable,
    End,
    Exists,
    Function,
    If,
    Loop,
    Noneditionable,
    Not,
    Or,
    Package,
    Procedure,
    Repeat,
    Replace,
    Trigger,
    Type,
    While,
}

static BLOCK_KEYWORDS: phf::Map<&[u8], BlockKeyword> = phf_map! {
    b"BEGIN" => BlockKeyword::Begin,
    b"BODY" => BlockKeyword::Body,
    b"CASE" => BlockKeyword::Case,
    b"CREATE" => BlockKeyword::Create,
    b"DECLARE" => BlockKeyword::Declare,
    b"DEFINER" => BlockKeyword::Definer,
    b"EDITIONABLE" => BlockKeyword::Editionable,
    b"END" => BlockKeyword::End,
    b"EXISTS" => BlockKeyword::Exists,
    b"FUNCTION" => BlockKeyword::Function,
    b"IF" => BlockKeyword::If,
    b"LOOP" => BlockKeyword::Loop,
    b"NONEDITIONABLE" => BlockKeyword::Noneditionable,
    b"NOT" => BlockKeyword::Not,
    b"OR" => BlockKeyword::Or,
    b"PACKAGE" => BlockKeyword::Package,
    b"PROCEDURE" => BlockKeyword::Procedure,
    b"REPEAT" => BlockKeyword::Repeat,
    b"REPLACE" => BlockKeyword::Replace,
    b"TRIGGER" => BlockKeyword::Trigger,
    b"TYPE" => BlockKeyword::Type,
    b"WHILE" => BlockKeyword::While,
};

/// Longest key in `BLOCK_KEYWORDS` (`NONEDITIONABLE`).
pub(crate) const MAX_BLOCK_KEYWORD_LEN: usize = 14;

/// Case-insensitive keyword lookup, allocation free.
pub(crate) fn block_keyword(word: &[u8]) -> Option<BlockKeyword> {
    if word.is_empty() || word.len() > MAX_BLOCK_KEYWORD_LEN {
        return None;
    }
    let mut buffer = [0u8; MAX_BLOCK_KEYWORD_LEN];
    for (b, u) in word.iter().zip(buffer.iter_mut()) {
        *u = b.to_ascii_uppercase();
    }
    BLOCK_KEYWORDS.get(&buffer[..word.len()]).copied()
}

/// Bytes that extend an identifier/keyword word. Bytes outside ASCII
/// belong to multibyte identifier characters; they extend the word (and
/// can never match the keyword table) rather than terminate it.
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(Some(BlockKeyword::Begin), block_keyword(b"begin"));
        assert_eq!(Some(BlockKeyword::Begin), block_keyword(b"Begin"));
        assert_eq!(Some(BlockKeyword::Noneditionable), block_keyword(b"noneditionable"));
        assert_eq!(None, block_keyword(b"beginning"));
        assert_eq!(None, block_keyword(b""));
        assert_eq!(None, block_keyword(b"x".repeat(40).as_slice()));
    }

    #[test]
    fn families() {
        assert!(Dialect::MySql.profile().is_some());
        assert!(Dialect::Doris.profile().unwrap().hash_comments);
        assert!(Dialect::OceanBaseOracle.profile().unwrap().line_hints);
        assert!(Dialect::Postgres.profile().is_none());
    }
}
