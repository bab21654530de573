//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for SQL that produces a stream of
//! tokens. The lexer reads characters through a [`CharStream`]; the
//! [`CaseFoldingStream`] adapter makes matching case-insensitive while token
//! text keeps the casing of the input.

mod char_stream;
mod span;
mod token;
mod tokenizer;

pub use char_stream::{CaseFoldingStream, CharStream, InputStream};
pub use span::Span;
pub use token::{Channel, Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
