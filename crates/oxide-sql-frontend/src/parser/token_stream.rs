//! Buffered, rewindable token stream.

use super::error::ParseError;
use crate::lexer::{Channel, CharStream, Lexer, Token};

/// A token stream that pulls from the lexer on demand.
///
/// Every token the lexer produces is kept, hidden-channel ones included, so
/// the stream can be rewound and replayed without lexing twice. Lookahead and
/// positions only count default-channel tokens.
pub struct TokenStream<S> {
    lexer: Lexer<S>,
    tokens: Vec<Token>,
    /// Indices into `tokens` of the default-channel tokens.
    visible: Vec<usize>,
    /// Current position, as an index into `visible`.
    pos: usize,
    /// Set once the EOF token has been buffered.
    done: bool,
    /// The lexer failure, replayed on every later fetch.
    failed: Option<ParseError>,
}

impl<S: CharStream> TokenStream<S> {
    /// Creates a stream over `lexer`. Nothing is lexed until the first
    /// lookahead.
    #[must_use]
    pub fn new(lexer: Lexer<S>) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            visible: Vec::new(),
            pos: 0,
            done: false,
            failed: None,
        }
    }

    /// Buffers tokens until `visible` has an entry for `index` or EOF is
    /// reached.
    fn fill(&mut self, index: usize) -> Result<(), ParseError> {
        while !self.done && self.visible.len() <= index {
            if let Some(err) = &self.failed {
                return Err(err.clone());
            }
            match self.lexer.next_token() {
                Ok(token) => {
                    self.done = token.is_eof();
                    if token.channel == Channel::Default {
                        self.visible.push(self.tokens.len());
                    }
                    self.tokens.push(token);
                }
                Err(err) => {
                    self.failed = Some(err.clone());
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Returns the `k`-th default-channel token ahead, where `k == 1` is the
    /// current token. Looking past the end yields the EOF token.
    pub fn lt(&mut self, k: usize) -> Result<&Token, ParseError> {
        let index = self.pos + k.saturating_sub(1);
        self.fill(index)?;
        let slot = index.min(self.visible.len().saturating_sub(1));
        self.visible
            .get(slot)
            .map(|&i| &self.tokens[i])
            .ok_or_else(|| ParseError::unpositioned("no tokens available"))
    }

    /// Moves past the current token. The stream never moves past EOF.
    pub fn consume(&mut self) {
        let at_eof = self
            .visible
            .get(self.pos)
            .is_some_and(|&i| self.tokens[i].is_eof());
        if !at_eof && self.pos < self.visible.len() {
            self.pos += 1;
        }
    }

    /// Returns the current position in default-channel tokens.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.pos
    }

    /// Moves to a position previously returned by [`TokenStream::index`].
    pub fn seek(&mut self, index: usize) {
        self.pos = index.min(self.visible.len());
    }

    /// Rewinds to the first token. Buffered tokens are kept for the replay.
    pub const fn reset(&mut self) {
        self.pos = 0;
    }

    /// Returns every token buffered so far, hidden ones included.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{CaseFoldingStream, InputStream, Keyword, TokenKind};
    use crate::parser::SyntaxErrorTranslator;

    fn stream(input: &str) -> TokenStream<CaseFoldingStream<InputStream<'_>>> {
        let mut lexer = Lexer::new(CaseFoldingStream::new(InputStream::new(input)));
        lexer.set_error_listener(Box::new(SyntaxErrorTranslator));
        TokenStream::new(lexer)
    }

    #[test]
    fn lookahead_skips_hidden_tokens() {
        let mut tokens = stream("SELECT  /* x */ a");
        assert_eq!(tokens.lt(1).unwrap().kind, TokenKind::Keyword(Keyword::Select));
        assert_eq!(tokens.lt(2).unwrap().text, "a");
        assert!(tokens.lt(3).unwrap().is_eof());
        assert!(tokens.lt(10).unwrap().is_eof());
    }

    #[test]
    fn lexing_is_lazy() {
        let mut tokens = stream("a b $");
        assert_eq!(tokens.lt(1).unwrap().text, "a");
        assert_eq!(tokens.tokens().len(), 1);
        assert!(tokens.lt(3).is_err());
        assert!(tokens.lt(3).is_err());
    }

    #[test]
    fn consume_stops_at_eof() {
        let mut tokens = stream("a");
        tokens.lt(1).unwrap();
        tokens.consume();
        assert!(tokens.lt(1).unwrap().is_eof());
        tokens.consume();
        tokens.consume();
        assert_eq!(tokens.index(), 1);
    }

    #[test]
    fn reset_replays_the_buffer() {
        let mut tokens = stream("a , b");
        for _ in 0..3 {
            tokens.lt(1).unwrap();
            tokens.consume();
        }
        let buffered = tokens.tokens().len();
        tokens.reset();
        assert_eq!(tokens.index(), 0);
        assert_eq!(tokens.lt(1).unwrap().text, "a");
        assert_eq!(tokens.tokens().len(), buffered);
    }
}
