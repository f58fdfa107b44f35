use solfront_types::{Span, Spanned};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    #[error("Expected an expression.")]
    ExpectedExpression,
    #[error("Expected `{expected}`.")]
    ExpectedToken { expected: &'static str },
    #[error("Expected an identifier.")]
    ExpectedIdent,
    #[error("Expected a type.")]
    ExpectedType,
    #[error("Expected a declaration (contract, function, event, using or a state variable).")]
    ExpectedDeclaration,
    #[error("Expected a statement.")]
    ExpectedStatement,
    #[error("Malformed number literal.")]
    MalformedNumberLiteral,
    #[error("The exponent of a number literal must be a non-negative decimal integer.")]
    MalformedNumberExponent,
    #[error("Expected a library name or a `{{...}}` list after `using`.")]
    ExpectedUsingTarget,
    #[error("Expected a type or `*` after `for`.")]
    ExpectedUsingForType,
    #[error("Expected an identifier or an operator symbol after `as`.")]
    ExpectedOperatorAlias,
    #[error("Expected a parameter declaration.")]
    ExpectedParameter,
    #[error("Duplicate `{modifier}` modifier.")]
    DuplicateModifier { modifier: &'static str },
    #[error("This expression cannot be assigned to.")]
    UnassignableExpression,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
#[error("{kind}")]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

impl Spanned for ParseError {
    fn span(&self) -> Span {
        self.span.clone()
    }
}
