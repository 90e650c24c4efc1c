//! Byte ranges into the parsed source.

use std::ops::Range;

/// A half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range. An inverted range collapses to an
    /// empty span at `start`.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(4..10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert_eq!(span.to_range(), 4..10);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let span = Span::new(8..3);
        assert!(span.is_empty());
        assert_eq!(span.start(), 8);
    }
}
