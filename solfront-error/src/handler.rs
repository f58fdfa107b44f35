use crate::error::CompileError;
use core::cell::RefCell;

/// A handler with which diagnostics are collected during a parse or an
/// analysis pass.
///
/// Fallible operations take a `&Handler`, record any diagnostics on it, and
/// return `Result<T, ErrorEmitted>`; the caller drains the handler once the
/// whole pass is over.
#[derive(Debug, Default)]
pub struct Handler {
    inner: RefCell<Vec<CompileError>>,
}

impl Handler {
    /// Emits an error to the handler, returning proof that one was emitted.
    pub fn emit_err(&self, err: CompileError) -> ErrorEmitted {
        self.inner.borrow_mut().push(err);
        ErrorEmitted { _priv: () }
    }

    pub fn has_errors(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Extracts all diagnostics emitted so far, consuming the handler.
    pub fn consume(self) -> Vec<CompileError> {
        self.inner.into_inner()
    }
}

/// Proof that an error was emitted through a [`Handler`].
///
/// Deliberately not constructible outside this crate, so a `ParseResult`'s
/// error arm can only be produced by actually recording a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorEmitted {
    _priv: (),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_error::{ParseError, ParseErrorKind};
    use solfront_types::Span;

    fn some_error() -> CompileError {
        CompileError::Parse {
            error: ParseError {
                span: Span::dummy(),
                kind: ParseErrorKind::ExpectedExpression,
            },
        }
    }

    #[test]
    fn collects_in_emission_order() {
        let handler = Handler::default();
        assert!(!handler.has_errors());
        handler.emit_err(some_error());
        handler.emit_err(some_error());
        assert_eq!(handler.error_count(), 2);
        assert_eq!(handler.consume().len(), 2);
    }
}
