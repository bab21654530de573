//! Token types for the SQL lexer.

use core::fmt;

use serde::Serialize;

use super::Span;

/// SQL keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    With,
    Values,
    Table,

    // Set operations
    Union,
    Except,
    Intersect,

    // Joins
    Join,
    Inner,
    Cross,
    Left,
    Right,
    Full,
    Outer,
    Semi,
    Anti,
    Natural,
    On,
    Using,

    // Predicates and logic
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Rlike,
    Is,
    Null,
    True,
    False,
    Exists,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,

    // Ordering
    Asc,
    Desc,
    Nulls,
    First,
    Last,

    // Statements
    Insert,
    Into,
    Overwrite,
    Delete,
    Update,
    Set,
    Create,
    Drop,
    If,
    Explain,
    Extended,

    // Commands passed through to the session layer
    Use,
    Grant,
    Revoke,
    Lock,
    Unlock,
    Analyze,

    // Complex types and column definitions
    Array,
    Map,
    Struct,
    Comment,
}

impl Keyword {
    /// Looks up a keyword from already upper-cased text.
    ///
    /// The lexer matches against the case-folded view of the input, so this
    /// lookup is exact: `"select"` is not a keyword here, `"SELECT"` is.
    #[must_use]
    pub fn from_folded(s: &str) -> Option<Self> {
        let keyword = match s {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "GROUP" => Self::Group,
            "BY" => Self::By,
            "HAVING" => Self::Having,
            "ORDER" => Self::Order,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "DISTINCT" => Self::Distinct,
            "ALL" => Self::All,
            "AS" => Self::As,
            "WITH" => Self::With,
            "VALUES" => Self::Values,
            "TABLE" => Self::Table,
            "UNION" => Self::Union,
            "EXCEPT" => Self::Except,
            "INTERSECT" => Self::Intersect,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "CROSS" => Self::Cross,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "FULL" => Self::Full,
            "OUTER" => Self::Outer,
            "SEMI" => Self::Semi,
            "ANTI" => Self::Anti,
            "NATURAL" => Self::Natural,
            "ON" => Self::On,
            "USING" => Self::Using,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "RLIKE" => Self::Rlike,
            "IS" => Self::Is,
            "NULL" => Self::Null,
            "TRUE" => Self::True,
            "FALSE" => Self::False,
            "EXISTS" => Self::Exists,
            "CASE" => Self::Case,
            "WHEN" => Self::When,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "CAST" => Self::Cast,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "NULLS" => Self::Nulls,
            "FIRST" => Self::First,
            "LAST" => Self::Last,
            "INSERT" => Self::Insert,
            "INTO" => Self::Into,
            "OVERWRITE" => Self::Overwrite,
            "DELETE" => Self::Delete,
            "UPDATE" => Self::Update,
            "SET" => Self::Set,
            "CREATE" => Self::Create,
            "DROP" => Self::Drop,
            "IF" => Self::If,
            "EXPLAIN" => Self::Explain,
            "EXTENDED" => Self::Extended,
            "USE" => Self::Use,
            "GRANT" => Self::Grant,
            "REVOKE" => Self::Revoke,
            "LOCK" => Self::Lock,
            "UNLOCK" => Self::Unlock,
            "ANALYZE" => Self::Analyze,
            "ARRAY" => Self::Array,
            "MAP" => Self::Map,
            "STRUCT" => Self::Struct,
            "COMMENT" => Self::Comment,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::With => "WITH",
            Self::Values => "VALUES",
            Self::Table => "TABLE",
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Cross => "CROSS",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Semi => "SEMI",
            Self::Anti => "ANTI",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Rlike => "RLIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Exists => "EXISTS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Nulls => "NULLS",
            Self::First => "FIRST",
            Self::Last => "LAST",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Overwrite => "OVERWRITE",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::If => "IF",
            Self::Explain => "EXPLAIN",
            Self::Extended => "EXTENDED",
            Self::Use => "USE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
            Self::Analyze => "ANALYZE",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::Struct => "STRUCT",
            Self::Comment => "COMMENT",
        }
    }

    /// Returns true if the grammar accepts this keyword wherever it accepts an
    /// identifier.
    ///
    /// None of these may legally follow a relation or an expression, otherwise
    /// an alias position would swallow them.
    #[must_use]
    pub const fn is_non_reserved(&self) -> bool {
        matches!(
            self,
            Self::Asc
                | Self::Desc
                | Self::Nulls
                | Self::First
                | Self::Last
                | Self::If
                | Self::Overwrite
                | Self::Explain
                | Self::Extended
                | Self::Use
                | Self::Grant
                | Self::Revoke
                | Self::Lock
                | Self::Unlock
                | Self::Analyze
                | Self::Array
                | Self::Map
                | Self::Struct
                | Self::Comment
        )
    }
}

/// The type tag of a token.
///
/// Literal values are not decoded here: the tag says what the lexer matched and
/// the AST builder decodes the token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// SQL keyword.
    Keyword(Keyword),
    /// Unquoted identifier (e.g. `column_name`).
    Identifier,
    /// Identifier wrapped in delimiters (e.g. `` `my col` ``).
    QuotedIdentifier,

    // Literals
    /// String literal, delimiters included.
    String,
    /// Integer literal without suffix.
    Integer,
    /// Integer literal with an `L` suffix.
    BigInt,
    /// Integer literal with an `S` suffix.
    SmallInt,
    /// Integer literal with a `Y` suffix.
    TinyInt,
    /// Decimal literal (e.g. `3.14`).
    Decimal,
    /// Double literal (`D` suffix or exponent).
    Double,
    /// Big decimal literal (`BD` suffix).
    BigDecimal,

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// = or ==
    Eq,
    /// <=>
    NullSafeEq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,

    // Hidden channel
    /// Run of whitespace.
    Whitespace,
    /// `--` line comment or `/* */` block comment.
    Comment,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true if this token may start an identifier position.
    #[must_use]
    pub const fn is_identifier_like(&self) -> bool {
        match self {
            Self::Identifier | Self::QuotedIdentifier => true,
            Self::Keyword(kw) => kw.is_non_reserved(),
            _ => false,
        }
    }

    /// Returns true for numeric literal tokens.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::BigInt
                | Self::SmallInt
                | Self::TinyInt
                | Self::Decimal
                | Self::Double
                | Self::BigDecimal
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Keyword(kw) => return write!(f, "'{}'", kw.as_str()),
            Self::Identifier | Self::QuotedIdentifier => "IDENTIFIER",
            Self::String => "STRING",
            Self::Integer => "INTEGER_VALUE",
            Self::BigInt => "BIGINT_LITERAL",
            Self::SmallInt => "SMALLINT_LITERAL",
            Self::TinyInt => "TINYINT_LITERAL",
            Self::Decimal => "DECIMAL_VALUE",
            Self::Double => "DOUBLE_LITERAL",
            Self::BigDecimal => "BIGDECIMAL_LITERAL",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Eq => "'='",
            Self::NullSafeEq => "'<=>'",
            Self::NotEq => "'<>'",
            Self::Lt => "'<'",
            Self::LtEq => "'<='",
            Self::Gt => "'>'",
            Self::GtEq => "'>='",
            Self::Concat => "'||'",
            Self::BitAnd => "'&'",
            Self::BitOr => "'|'",
            Self::BitXor => "'^'",
            Self::BitNot => "'~'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Dot => "'.'",
            Self::Colon => "':'",
            Self::Whitespace => "WS",
            Self::Comment => "COMMENT",
            Self::Eof => "<EOF>",
        };
        f.write_str(text)
    }
}

/// The channel a token is emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Channel {
    /// Seen by the parser.
    Default,
    /// Kept in the buffer but skipped by parser lookahead.
    Hidden,
}

/// A token with its location in the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The type tag.
    pub kind: TokenKind,
    /// The matched text, with its original casing.
    pub text: String,
    /// Byte range in the original input.
    pub span: Span,
    /// The channel this token was emitted on.
    pub channel: Channel,
    /// Line of the first character (1-based).
    pub line: usize,
    /// Column of the first character, in characters (0-based).
    pub column: usize,
}

impl Token {
    /// Creates a default-channel token.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        span: Span,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            channel: Channel::Default,
            line,
            column,
        }
    }

    /// Moves the token to the hidden channel.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.channel = Channel::Hidden;
        self
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the text the way syntax error messages quote it.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.is_eof() {
            "<EOF>"
        } else {
            &self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_expects_folded_text() {
        assert_eq!(Keyword::from_folded("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_folded("select"), None);
        assert_eq!(Keyword::from_folded("NOT_A_KEYWORD"), None);
    }

    #[test]
    fn keyword_round_trips_through_as_str() {
        for kw in [Keyword::Select, Keyword::Rlike, Keyword::Struct, Keyword::Natural] {
            assert_eq!(Keyword::from_folded(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn clause_keywords_are_reserved() {
        assert!(!Keyword::From.is_non_reserved());
        assert!(!Keyword::Where.is_non_reserved());
        assert!(!Keyword::Join.is_non_reserved());
        assert!(!Keyword::Set.is_non_reserved());
        assert!(Keyword::First.is_non_reserved());
        assert!(Keyword::Struct.is_non_reserved());
    }

    #[test]
    fn identifier_like_kinds() {
        assert!(TokenKind::Identifier.is_identifier_like());
        assert!(TokenKind::QuotedIdentifier.is_identifier_like());
        assert!(TokenKind::Keyword(Keyword::Desc).is_identifier_like());
        assert!(!TokenKind::Keyword(Keyword::Select).is_identifier_like());
        assert!(!TokenKind::String.is_identifier_like());
    }

    #[test]
    fn eof_displays_as_marker() {
        let eof = Token::new(TokenKind::Eof, "", Span::new(4, 4), 1, 4);
        assert_eq!(eof.display_text(), "<EOF>");
        assert_eq!(TokenKind::Eof.to_string(), "<EOF>");
        assert_eq!(TokenKind::Keyword(Keyword::From).to_string(), "'FROM'");
    }
}
