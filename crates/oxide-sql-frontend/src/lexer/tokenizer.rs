//! SQL Tokenizer implementation.

use super::{CharStream, Keyword, Span, Token, TokenKind};
use crate::parser::{ConsoleErrorListener, ErrorListener, ParseError};

/// A lexer that tokenizes SQL input.
///
/// All matching decisions are made on [`CharStream::la`], so wrapping the
/// input in a [`CaseFoldingStream`](super::CaseFoldingStream) makes keywords
/// and literal suffixes case-insensitive. Token text is always sliced from
/// the original buffer.
pub struct Lexer<S> {
    input: S,
    /// Byte offset where the current token starts.
    start: usize,
    start_line: usize,
    start_column: usize,
    line: usize,
    column: usize,
    double_quoted_identifiers: bool,
    listener: Box<dyn ErrorListener>,
}

impl<S: CharStream> Lexer<S> {
    /// Creates a new lexer reading from `input`.
    ///
    /// Violations go to a [`ConsoleErrorListener`] until another listener is
    /// installed.
    #[must_use]
    pub fn new(input: S) -> Self {
        Self {
            input,
            start: 0,
            start_line: 1,
            start_column: 0,
            line: 1,
            column: 0,
            double_quoted_identifiers: false,
            listener: Box::new(ConsoleErrorListener),
        }
    }

    /// Lexes `"..."` as a quoted identifier instead of a string literal.
    #[must_use]
    pub const fn with_double_quoted_identifiers(mut self, enabled: bool) -> Self {
        self.double_quoted_identifiers = enabled;
        self
    }

    /// Replaces the error listener.
    pub fn set_error_listener(&mut self, listener: Box<dyn ErrorListener>) {
        self.listener = listener;
    }

    /// Returns the current (folded) character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.la(1)
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        self.input.la(2)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.input.consume();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let span = Span::new(self.start, self.input.index());
        Token::new(
            kind,
            self.input.text(span),
            span,
            self.start_line,
            self.start_column,
        )
    }

    /// Reports a violation covering the text consumed so far.
    fn error(&self) -> ParseError {
        let text = self.input.text(Span::new(self.start, self.input.index()));
        let message = format!("token recognition error at: '{text}'");
        self.listener
            .syntax_error(None, self.start_line, self.start_column, &message)
    }

    fn scan_whitespace(&mut self) -> Token {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.make_token(TokenKind::Whitespace).hidden()
    }

    fn scan_line_comment(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        self.make_token(TokenKind::Comment).hidden()
    }

    fn scan_block_comment(&mut self) -> Result<Token, ParseError> {
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(self.make_token(TokenKind::Comment).hidden());
                }
                Some(_) => {}
                None => return Err(self.error()),
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        let mut folded = String::new();
        while let Some(c) = self.peek().filter(|&c| is_word_char(c)) {
            folded.push(c);
            self.advance();
        }
        let kind = Keyword::from_folded(&folded).map_or(TokenKind::Identifier, TokenKind::Keyword);
        self.make_token(kind)
    }

    /// Scans a delimited identifier; a doubled delimiter stands for itself.
    fn scan_quoted_identifier(&mut self, quote: char) -> Result<Token, ParseError> {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(self.make_token(TokenKind::QuotedIdentifier));
                    }
                }
                Some(_) => {}
                None => return Err(self.error()),
            }
        }
    }

    /// Scans a string literal; a backslash escapes the next character.
    fn scan_string(&mut self, quote: char) -> Result<Token, ParseError> {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(self.make_token(TokenKind::String)),
                Some('\\') => {
                    if self.advance().is_none() {
                        return Err(self.error());
                    }
                }
                Some(_) => {}
                None => return Err(self.error()),
            }
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Scans a numeric literal.
    ///
    /// A run of digits directly followed by word characters is an identifier
    /// (`1st`), unless the word characters are one of the literal suffixes.
    fn scan_number(&mut self) -> Token {
        let mut fractional = false;
        let mut exponent = false;

        self.skip_digits();
        if self.peek() == Some('.') {
            fractional = true;
            self.advance();
            self.skip_digits();
        }

        if self.peek() == Some('E') {
            let digit_at = if matches!(self.peek_next(), Some('+' | '-')) {
                3
            } else {
                2
            };
            if self.input.la(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                exponent = true;
                self.advance(); // E
                if digit_at == 3 {
                    self.advance(); // sign
                }
                self.skip_digits();
            }
        }

        let suffix = match (self.peek(), self.peek_next()) {
            (Some('B'), Some('D')) if !self.input.la(3).is_some_and(is_word_char) => {
                Some((TokenKind::BigDecimal, 2))
            }
            (Some(c), next) if !next.is_some_and(is_word_char) => match c {
                'D' => Some((TokenKind::Double, 1)),
                'L' if !fractional && !exponent => Some((TokenKind::BigInt, 1)),
                'S' if !fractional && !exponent => Some((TokenKind::SmallInt, 1)),
                'Y' if !fractional && !exponent => Some((TokenKind::TinyInt, 1)),
                _ => None,
            },
            _ => None,
        };
        if let Some((kind, len)) = suffix {
            for _ in 0..len {
                self.advance();
            }
            return self.make_token(kind);
        }

        if !fractional && !exponent && self.peek().is_some_and(is_word_char) {
            while self.peek().is_some_and(is_word_char) {
                self.advance();
            }
            return self.make_token(TokenKind::Identifier);
        }

        let kind = if exponent {
            TokenKind::Double
        } else if fractional {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        self.make_token(kind)
    }

    /// Scans the next token, hidden-channel tokens included.
    ///
    /// Once the input is exhausted every call returns an EOF token.
    ///
    /// # Errors
    ///
    /// Returns the listener's error for characters that start no token and
    /// for unterminated strings, quoted identifiers and block comments.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.start = self.input.index();
        self.start_line = self.line;
        self.start_column = self.column;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let token = match c {
            c if c.is_whitespace() => self.scan_whitespace(),
            '-' if self.peek_next() == Some('-') => self.scan_line_comment(),
            '/' if self.peek_next() == Some('*') => self.scan_block_comment()?,
            '\'' => self.scan_string('\'')?,
            '"' if self.double_quoted_identifiers => self.scan_quoted_identifier('"')?,
            '"' => self.scan_string('"')?,
            '`' => self.scan_quoted_identifier('`')?,
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_word_char(c) => self.scan_word(),
            _ => {
                self.advance();
                let next = self.peek();
                let (kind, extra) = match (c, next) {
                    ('(', _) => (TokenKind::LeftParen, 0),
                    (')', _) => (TokenKind::RightParen, 0),
                    ('[', _) => (TokenKind::LeftBracket, 0),
                    (']', _) => (TokenKind::RightBracket, 0),
                    (',', _) => (TokenKind::Comma, 0),
                    (';', _) => (TokenKind::Semicolon, 0),
                    ('.', _) => (TokenKind::Dot, 0),
                    (':', _) => (TokenKind::Colon, 0),
                    ('+', _) => (TokenKind::Plus, 0),
                    ('-', _) => (TokenKind::Minus, 0),
                    ('*', _) => (TokenKind::Star, 0),
                    ('/', _) => (TokenKind::Slash, 0),
                    ('%', _) => (TokenKind::Percent, 0),
                    ('~', _) => (TokenKind::BitNot, 0),
                    ('^', _) => (TokenKind::BitXor, 0),
                    ('&', _) => (TokenKind::BitAnd, 0),
                    ('|', Some('|')) => (TokenKind::Concat, 1),
                    ('|', _) => (TokenKind::BitOr, 0),
                    ('=', Some('=')) => (TokenKind::Eq, 1),
                    ('=', _) => (TokenKind::Eq, 0),
                    ('!', Some('=')) | ('<', Some('>')) => (TokenKind::NotEq, 1),
                    ('<', Some('=')) if self.peek_next() == Some('>') => {
                        (TokenKind::NullSafeEq, 2)
                    }
                    ('<', Some('=')) => (TokenKind::LtEq, 1),
                    ('<', _) => (TokenKind::Lt, 0),
                    ('>', Some('=')) => (TokenKind::GtEq, 1),
                    ('>', _) => (TokenKind::Gt, 0),
                    _ => return Err(self.error()),
                };
                for _ in 0..extra {
                    self.advance();
                }
                self.make_token(kind)
            }
        };
        Ok(token)
    }

    /// Tokenizes the entire input, hidden tokens included, up to and
    /// including the EOF token.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Lexer::next_token`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
