//! Character sources for the lexer.

use super::Span;

/// A seekable stream of characters over an in-memory buffer.
///
/// Positions are byte offsets into the original input.
pub trait CharStream {
    /// Returns the `i`-th character ahead of the current position, where
    /// `i == 1` is the next character to be consumed.
    ///
    /// Returns `None` past the end of input and for `i == 0`.
    fn la(&self, i: usize) -> Option<char>;

    /// Advances past the next character. Does nothing at end of input.
    fn consume(&mut self);

    /// Returns the current byte offset.
    fn index(&self) -> usize;

    /// Moves to the given byte offset. The offset must be a char boundary.
    fn seek(&mut self, index: usize);

    /// Returns the original text covered by `span`.
    fn text(&self, span: Span) -> &str;
}

/// A character stream over a string slice.
#[derive(Debug, Clone)]
pub struct InputStream<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> InputStream<'a> {
    /// Creates a stream positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl CharStream for InputStream<'_> {
    fn la(&self, i: usize) -> Option<char> {
        if i == 0 {
            return None;
        }
        self.input[self.pos..].chars().nth(i - 1)
    }

    fn consume(&mut self) {
        if let Some(c) = self.input[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn index(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, index: usize) {
        self.pos = index.min(self.input.len());
    }

    fn text(&self, span: Span) -> &str {
        let end = span.end.min(self.input.len());
        let start = span.start.min(end);
        &self.input[start..end]
    }
}

/// Exposes an upper-cased view of another stream's lookahead.
///
/// Only [`CharStream::la`] is folded: consumption, positions and text
/// retrieval go straight to the wrapped stream, so token text keeps the
/// casing the user wrote.
#[derive(Debug, Clone)]
pub struct CaseFoldingStream<S> {
    inner: S,
}

impl<S: CharStream> CaseFoldingStream<S> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: CharStream> CharStream for CaseFoldingStream<S> {
    fn la(&self, i: usize) -> Option<char> {
        self.inner.la(i).map(fold)
    }

    fn consume(&mut self) {
        self.inner.consume();
    }

    fn index(&self) -> usize {
        self.inner.index()
    }

    fn seek(&mut self, index: usize) {
        self.inner.seek(index);
    }

    fn text(&self, span: Span) -> &str {
        self.inner.text(span)
    }
}

/// Upper-cases a single code point.
///
/// Characters whose upper case is more than one code point (`ß`) keep their
/// original value so that one lookahead position stays one character.
fn fold(c: char) -> char {
    if c == '\0' {
        return c;
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_stream_lookahead_and_consume() {
        let mut stream = InputStream::new("ab");
        assert_eq!(stream.la(0), None);
        assert_eq!(stream.la(1), Some('a'));
        assert_eq!(stream.la(2), Some('b'));
        assert_eq!(stream.la(3), None);
        stream.consume();
        assert_eq!(stream.index(), 1);
        assert_eq!(stream.la(1), Some('b'));
        stream.consume();
        stream.consume();
        assert_eq!(stream.index(), 2);
        assert_eq!(stream.la(1), None);
    }

    #[test]
    fn folding_only_affects_lookahead() {
        let mut stream = CaseFoldingStream::new(InputStream::new("SeLeCt x"));
        assert_eq!(stream.la(1), Some('S'));
        assert_eq!(stream.la(2), Some('E'));
        for _ in 0..6 {
            stream.consume();
        }
        assert_eq!(stream.index(), 6);
        assert_eq!(stream.text(Span::new(0, 6)), "SeLeCt");
    }

    #[test]
    fn sentinels_pass_through() {
        let stream = CaseFoldingStream::new(InputStream::new("\0"));
        assert_eq!(stream.la(1), Some('\0'));
        assert_eq!(stream.la(2), None);
    }

    #[test]
    fn multi_char_upper_case_is_left_alone() {
        assert_eq!(fold('ß'), 'ß');
        assert_eq!(fold('é'), 'É');
        assert_eq!(fold('1'), '1');
    }

    #[test]
    fn positions_are_byte_offsets() {
        let mut stream = InputStream::new("é1");
        stream.consume();
        assert_eq!(stream.index(), 2);
        stream.seek(0);
        assert_eq!(stream.la(1), Some('é'));
    }
}
