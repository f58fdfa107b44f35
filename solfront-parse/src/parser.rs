use crate::lexer::TokenStream;
use solfront_ast::token::{Token, TokenKind};
use solfront_error::{
    error::CompileError,
    handler::{ErrorEmitted, Handler},
    parser_error::{ParseError, ParseErrorKind},
};
use solfront_types::{Ident, Span, Spanned};

pub type ParseResult<T> = Result<T, ErrorEmitted>;

/// The recursive-descent parser over a scanned [`TokenStream`].
///
/// The cursor always rests on a non-comment token; comment tokens are part
/// of the stream but never surface here. Reaching the `Eof` token parks the
/// cursor on it permanently.
pub struct Parser<'a, 'e> {
    tokens: &'a [Token],
    index: usize,
    full_span: Span,
    handler: &'e Handler,
}

impl<'a, 'e> Parser<'a, 'e> {
    pub fn new(handler: &'e Handler, token_stream: &'a TokenStream) -> Parser<'a, 'e> {
        let mut parser = Parser {
            tokens: token_stream.tokens(),
            index: 0,
            full_span: token_stream.span(),
            handler,
        };
        parser.skip_comments();
        parser
    }

    pub fn handler(&self) -> &'e Handler {
        self.handler
    }

    /// A zero-length span at the start of the source, for empty trees.
    pub fn zero_span(&self) -> Span {
        let full = &self.full_span;
        Span::new(full.src().clone(), 0, 0, full.path().cloned())
            .unwrap_or_else(Span::dummy)
    }

    pub fn cur(&self) -> &Token {
        // The stream always carries a terminal Eof token.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub fn cur_kind(&self) -> TokenKind {
        self.cur().kind
    }

    pub fn cur_span(&self) -> Span {
        self.cur().span.clone()
    }

    /// The kind of the token after the cursor, comments skipped.
    pub fn peek_kind(&self) -> TokenKind {
        self.peek_nth_kind(1)
    }

    /// The kind of the `n`th token after the cursor, comments skipped.
    pub fn peek_nth_kind(&self, n: usize) -> TokenKind {
        let last = self.tokens.len() - 1;
        let mut index = self.index;
        for _ in 0..n {
            index += 1;
            while index < last && self.tokens[index].kind == TokenKind::Comment {
                index += 1;
            }
        }
        self.tokens[index.min(last)].kind
    }

    fn skip_comments(&mut self) {
        while self.cur_kind() == TokenKind::Comment {
            self.index += 1;
        }
    }

    pub fn at_end(&self) -> bool {
        matches!(self.cur_kind(), TokenKind::Eof | TokenKind::Illegal)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.cur_kind() == kind
    }

    /// Consumes and returns the current token.
    pub fn bump(&mut self) -> Token {
        let token = self.cur().clone();
        if !self.at_end() {
            self.index += 1;
            self.skip_comments();
        }
        token
    }

    /// Consumes the current token only if it is of `kind`.
    pub fn take(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// Consumes a token of `kind` or records an expected-token diagnostic.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.take(kind) {
            Some(token) => Ok(token),
            None => Err(self.emit_error(ParseErrorKind::ExpectedToken {
                expected: kind.as_str(),
            })),
        }
    }

    pub fn expect_ident(&mut self) -> ParseResult<Ident> {
        match self.take(TokenKind::Identifier) {
            Some(token) => Ok(Ident::new(token.span)),
            None => Err(self.emit_error(ParseErrorKind::ExpectedIdent)),
        }
    }

    /// Records a diagnostic against the current token.
    pub fn emit_error(&mut self, kind: ParseErrorKind) -> ErrorEmitted {
        self.emit_error_with_span(kind, self.cur_span())
    }

    pub fn emit_error_with_span(&mut self, kind: ParseErrorKind, span: Span) -> ErrorEmitted {
        self.handler.emit_err(CompileError::Parse {
            error: ParseError { span, kind },
        })
    }

    /// Statement-level resynchronization: skips forward past the next `;`,
    /// but never past a `}` or the end of input, so an enclosing block can
    /// still close properly.
    pub fn recover_to_boundary(&mut self) {
        loop {
            match self.cur_kind() {
                TokenKind::Eof | TokenKind::Illegal | TokenKind::RBrace => break,
                TokenKind::Semicolon => {
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Joins `start` with the span of the last consumed token, covering a
    /// whole production.
    pub fn span_from(&self, start: &Span) -> Span {
        let mut index = self.index.min(self.tokens.len() - 1);
        while index > 0 && self.tokens[index - 1].kind == TokenKind::Comment {
            index -= 1;
        }
        let last = if index == 0 {
            self.cur_span()
        } else {
            self.tokens[index - 1].span()
        };
        Span::join(start.clone(), last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use std::sync::Arc;

    fn stream(text: &str, handler: &Handler) -> TokenStream {
        let src: Arc<str> = text.into();
        lex(handler, src, None).unwrap()
    }

    #[test]
    fn cursor_skips_comments() {
        let handler = Handler::default();
        let ts = stream("a /* gap */ b // tail\nc", &handler);
        let mut parser = Parser::new(&handler, &ts);
        assert_eq!(parser.cur_kind(), TokenKind::Identifier);
        assert_eq!(parser.peek_kind(), TokenKind::Identifier);
        assert_eq!(parser.bump().literal(), "a");
        assert_eq!(parser.bump().literal(), "b");
        assert_eq!(parser.bump().literal(), "c");
        assert!(parser.at_end());
    }

    #[test]
    fn bump_parks_on_eof() {
        let handler = Handler::default();
        let ts = stream("x", &handler);
        let mut parser = Parser::new(&handler, &ts);
        parser.bump();
        assert_eq!(parser.bump().kind, TokenKind::Eof);
        assert_eq!(parser.bump().kind, TokenKind::Eof);
    }

    #[test]
    fn expect_records_a_diagnostic() {
        let handler = Handler::default();
        let ts = stream("x", &handler);
        let mut parser = Parser::new(&handler, &ts);
        assert!(parser.expect(TokenKind::Semicolon).is_err());
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn recovery_stops_before_a_closing_brace() {
        let handler = Handler::default();
        let ts = stream("a b c } d", &handler);
        let mut parser = Parser::new(&handler, &ts);
        parser.recover_to_boundary();
        assert_eq!(parser.cur_kind(), TokenKind::RBrace);
    }

    #[test]
    fn recovery_consumes_a_semicolon() {
        let handler = Handler::default();
        let ts = stream("a b ; c", &handler);
        let mut parser = Parser::new(&handler, &ts);
        parser.recover_to_boundary();
        assert_eq!(parser.cur().literal(), "c");
    }
}
