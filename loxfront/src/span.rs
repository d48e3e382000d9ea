use std::fmt;

/// Position of a piece of source text.
///
/// `line` and `column` are 1-based, the column counts characters.
/// `start..end` is the byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, column: usize, start: usize, end: usize) -> Self {
        Self { line, column, start, end }
    }

    /// Span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            line: self.line,
            column: self.column,
            start: self.start,
            end: other.end.max(self.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            start: 0,
            end: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_keeps_start_position() {
        let a = Span::new(2, 5, 10, 12);
        let b = Span::new(2, 9, 14, 20);
        let joined = a.to(&b);
        assert_eq!(joined.line, 2);
        assert_eq!(joined.column, 5);
        assert_eq!(joined.start, 10);
        assert_eq!(joined.end, 20);
        assert_eq!(joined.len(), 10);
    }

    #[test]
    fn default_is_first_column_of_first_line() {
        let span = Span::default();
        assert_eq!(span.to_string(), "1:1");
        assert!(span.is_empty());
    }
}
