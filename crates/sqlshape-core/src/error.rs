//! The analyzer's top-level error type, per §7.

use thiserror::Error;

use crate::inference::InferenceError;
use crate::parser::ParseError;
use crate::preprocessor::PreprocessorError;

/// Everything that can go wrong analyzing a statement.
#[derive(Debug, Clone, Error)]
pub enum AnalyzerError {
    /// A malformed `${name}` placeholder.
    #[error(transparent)]
    Preprocessor(#[from] PreprocessorError),

    /// A syntax error, anchored to a byte offset into the preprocessed SQL.
    #[error("syntax error at offset {offset}: {source}")]
    Parse {
        offset: usize,
        #[source]
        source: ParseError,
    },

    /// The prepared-statement probe (`PREPARE`/`DESCRIBE`) failed or
    /// returned something the analyzer couldn't interpret.
    #[error("prepared-statement probe failed: {0}")]
    Probe(String),

    /// The catalog snapshot didn't contain something the statement
    /// referenced, or couldn't be loaded.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Name resolution or nullability inference failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The statement uses the supported grammar in a way this analyzer
    /// cannot soundly classify — e.g. a bare parameter placeholder
    /// standing directly in an output column position, where the
    /// analyzer has no schema-derived nullability to report.
    #[error("unsupported statement shape: {0}")]
    UserSchema(String),
}

impl From<ParseError> for AnalyzerError {
    fn from(err: ParseError) -> Self {
        let offset = err.offset();
        Self::Parse { offset, source: err }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    #[test]
    fn test_parse_error_carries_offset() {
        let parse_err = ParseError::new(Span::new(12, 14), "bad", "@@");
        let err: AnalyzerError = parse_err.into();
        match err {
            AnalyzerError::Parse { offset, .. } => assert_eq!(offset, 12),
            other => panic!("unexpected variant: {other}"),
        }
    }
}
