/// A byte range `[start, end)` into a source buffer.
///
/// Blocks store spans rather than copied text: slicing the source with a
/// closed block's span reproduces the exact text the block claimed,
/// markers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slices `text` with this span, clamped to the text's bounds.
    pub fn slice(self, text: &str) -> &str {
        let end = self.end.min(text.len());
        let start = self.start.min(end);
        &text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(2, 6).len(), 4);
        assert!(Span::new(3, 3).is_empty());
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn contains_nested_span() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(Span::new(0, 10)));
        assert!(outer.contains(Span::new(4, 6)));
        assert!(!outer.contains(Span::new(4, 11)));
    }

    #[test]
    fn slice_is_clamped() {
        assert_eq!(Span::new(1, 3).slice("abcd"), "bc");
        assert_eq!(Span::new(2, 40).slice("abcd"), "cd");
        assert_eq!(Span::new(9, 40).slice("abcd"), "");
    }
}
