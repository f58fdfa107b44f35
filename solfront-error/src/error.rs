use crate::{lex_error::LexError, parser_error::ParseError};
use solfront_types::{LineCol, LineIndex, Span, Spanned};
use thiserror::Error;

/// Every diagnostic the front end can produce, by phase.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum CompileError {
    #[error("{error}")]
    Lex { error: LexError },
    #[error("{error}")]
    Parse { error: ParseError },
}

impl CompileError {
    /// The 1-based line/column of the diagnostic's start, for rendering.
    pub fn line_col(&self, line_index: &LineIndex) -> LineCol {
        line_index.line_col(self.span().start())
    }
}

impl Spanned for CompileError {
    fn span(&self) -> Span {
        match self {
            CompileError::Lex { error } => error.span(),
            CompileError::Parse { error } => error.span(),
        }
    }
}
