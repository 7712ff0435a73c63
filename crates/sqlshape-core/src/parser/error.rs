//! Parser error type, per §7.

use std::fmt;

use crate::lexer::Span;

/// A syntax error raised while parsing a preprocessed statement. `offset` is
/// a byte offset into the *rewritten* (post-preprocessor) SQL text, per the
/// `ParseError { offset }` contract in §7 — callers that need to report
/// against the user's original text must account for the preprocessor's
/// `${name}` → `$n` rewriting themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
    pub found: String,
}

impl ParseError {
    #[must_use]
    pub fn new(span: Span, message: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            expected: Vec::new(),
            found: found.into(),
        }
    }

    #[must_use]
    pub fn unexpected(span: Span, expected: &[&str], found: impl Into<String>) -> Self {
        let found = found.into();
        Self {
            span,
            message: "unexpected token".to_string(),
            expected: expected.iter().map(|s| (*s).to_string()).collect(),
            found,
        }
    }

    #[must_use]
    pub fn unexpected_eof(span: Span, expected: &[&str]) -> Self {
        Self::unexpected(span, expected, "end of input")
    }

    /// The byte offset this error anchors to, for `AnalyzerError::ParseError { offset }`.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected.is_empty() {
            write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
        } else {
            write!(
                f,
                "expected one of [{}], found '{}' at {}..{}",
                self.expected.join(", "),
                self.found,
                self.span.start,
                self.span.end
            )
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_matches_span_start() {
        let err = ParseError::new(Span::new(5, 8), "bad token", "@@");
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = ParseError::unexpected_eof(Span::new(10, 10), &["FROM", "WHERE"]);
        assert!(err.to_string().contains("end of input"));
    }
}
