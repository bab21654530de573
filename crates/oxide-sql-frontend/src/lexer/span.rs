//! Byte ranges into the original command text.

use serde::Serialize;

/// A half-open byte range `[start, end)` into the original input.
///
/// Spans always refer to the case-preserved text, never to the folded view
/// the lexer matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span with `margin` bytes removed from both edges.
    ///
    /// A span shorter than two margins collapses to an empty span at its
    /// midpoint instead of underflowing.
    #[must_use]
    pub const fn shrink(self, margin: usize) -> Self {
        if self.len() < margin * 2 {
            let mid = self.start + self.len() / 2;
            return Self::new(mid, mid);
        }
        Self::new(self.start + margin, self.end - margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_peels_both_edges() {
        let span = Span::new(3, 9);
        assert_eq!(span.shrink(1), Span::new(4, 8));
        assert_eq!(span.shrink(0), span);
    }

    #[test]
    fn shrink_never_underflows() {
        let span = Span::new(4, 5);
        let shrunk = span.shrink(1);
        assert!(shrunk.is_empty());
        assert_eq!(shrunk.start, 4);
    }
}
