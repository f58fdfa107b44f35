use solfront_types::{Span, Spanned};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
#[error("{kind}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// Lexical errors terminate scanning: the scanner surfaces one of these plus
/// a terminal `Illegal` token and produces nothing further.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    #[error("Invalid character `{character}`.")]
    InvalidCharacter { position: usize, character: char },
    #[error("Unterminated string literal.")]
    UnterminatedStringLiteral { position: usize },
    #[error("Unterminated multiline comment.")]
    UnterminatedMultilineComment { position: usize },
}

impl Spanned for LexError {
    fn span(&self) -> Span {
        self.span.clone()
    }
}
