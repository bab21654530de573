//! Syntax error listeners.
//!
//! The lexer and the parser report every violation to a listener. The
//! listener turns it into the error value the recognizer aborts with; there
//! is no recovery and nothing is accumulated.

use tracing::debug;

use super::error::{Origin, ParseError};
use crate::lexer::Token;

/// Receives syntax violations from a recognizer.
pub trait ErrorListener {
    /// Converts a violation into the error the recognizer returns.
    ///
    /// `offending` is the token at fault when the parser reports; the lexer
    /// has no token yet and passes `None`.
    fn syntax_error(
        &self,
        offending: Option<&Token>,
        line: usize,
        column: usize,
        message: &str,
    ) -> ParseError;
}

/// The listener recognizers start with.
///
/// Logs the violation and produces an unpositioned error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleErrorListener;

impl ErrorListener for ConsoleErrorListener {
    fn syntax_error(
        &self,
        _offending: Option<&Token>,
        line: usize,
        column: usize,
        message: &str,
    ) -> ParseError {
        debug!(line, column, "line {line}:{column} {message}");
        ParseError::unpositioned(message)
    }
}

/// Converts violations into positioned [`ParseError`]s.
///
/// The start origin is the violation point. For a token, the stop origin is
/// the column just past the token's last character.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxErrorTranslator;

impl ErrorListener for SyntaxErrorTranslator {
    fn syntax_error(
        &self,
        offending: Option<&Token>,
        line: usize,
        column: usize,
        message: &str,
    ) -> ParseError {
        let (start, stop) = offending.map_or_else(
            || (Origin::new(line, column), Origin::new(line, column)),
            |token| {
                let start = Origin::new(line, token.column);
                let stop = Origin::new(line, token.column + token.text.chars().count());
                (start, stop)
            },
        );
        ParseError::new(message, start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Span, TokenKind};

    #[test]
    fn translator_positions_token_errors() {
        let token = Token::new(TokenKind::Identifier, "foo", Span::new(7, 10), 2, 4);
        let err = SyntaxErrorTranslator.syntax_error(Some(&token), 2, 4, "bad");
        assert_eq!(err.message, "bad");
        assert_eq!(err.start, Origin::new(2, 4));
        assert_eq!(err.stop, Origin::new(2, 7));
        assert_eq!(err.command(), None);
    }

    #[test]
    fn translator_positions_lexer_errors() {
        let err = SyntaxErrorTranslator.syntax_error(None, 1, 9, "token recognition error at: '$'");
        assert_eq!(err.start, Origin::new(1, 9));
        assert_eq!(err.stop, err.start);
    }

    #[test]
    fn console_listener_is_unpositioned() {
        let err = ConsoleErrorListener.syntax_error(None, 1, 2, "bad");
        assert!(err.start.is_unknown());
    }
}
