use extension_trait::extension_trait;
use solfront_ast::token::{lookup_ident, Token, TokenKind};
use solfront_error::{
    error::CompileError,
    handler::{ErrorEmitted, Handler},
    lex_error::{LexError, LexErrorKind},
};
use solfront_types::Span;
use std::{path::PathBuf, sync::Arc};

/// The complete token sequence of one source buffer, ending in a terminal
/// `Eof` (or `Illegal`) token.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    full_span: Span,
}

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn span(&self) -> Span {
        self.full_span.clone()
    }
}

#[extension_trait]
impl CharExt for char {
    fn is_ident_start(self) -> bool {
        self.is_ascii_alphabetic() || self == '_'
    }

    fn is_ident_continue(self) -> bool {
        self.is_ascii_alphanumeric() || self == '_'
    }

    fn is_digit_or_separator(self, radix: u32) -> bool {
        self.is_digit(radix) || self == '_'
    }
}

/// The scanner: a synchronous, pull-based token iterator.
///
/// It covers the entire input, terminating with a single `Eof` token, or
/// with a single `Illegal` token after recording a lexical error on the
/// handler. No tokens follow either terminal token.
pub struct Lexer<'e> {
    handler: &'e Handler,
    src: Arc<str>,
    path: Option<Arc<PathBuf>>,
    pos: usize,
    terminated: bool,
    err: Option<ErrorEmitted>,
}

impl<'e> Lexer<'e> {
    pub fn new(handler: &'e Handler, src: Arc<str>, path: Option<Arc<PathBuf>>) -> Lexer<'e> {
        Lexer {
            handler,
            src,
            path,
            pos: 0,
            terminated: false,
            err: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.src.clone(), start, end, self.path.clone())
            .expect("scanner positions are in bounds")
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: self.span(start, self.pos),
        }
    }

    fn illegal(&mut self, kind: LexErrorKind, start: usize) -> Token {
        self.terminated = true;
        let span = self.span(start, self.pos);
        self.err = Some(self.handler.emit_err(CompileError::Lex {
            error: LexError {
                span: span.clone(),
                kind,
            },
        }));
        Token {
            kind: TokenKind::Illegal,
            span,
        }
    }

    /// Produces the next token, or `None` once a terminal token has been
    /// returned.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.terminated {
            return None;
        }
        self.bump_while(|c| c.is_whitespace());
        let start = self.pos;
        let Some(c) = self.bump() else {
            self.terminated = true;
            return Some(Token {
                kind: TokenKind::Eof,
                span: self.span(start, start),
            });
        };
        let token = match c {
            '(' => self.token(TokenKind::LParen, start),
            ')' => self.token(TokenKind::RParen, start),
            '{' => self.token(TokenKind::LBrace, start),
            '}' => self.token(TokenKind::RBrace, start),
            '[' => self.token(TokenKind::LBracket, start),
            ']' => self.token(TokenKind::RBracket, start),
            ';' => self.token(TokenKind::Semicolon, start),
            ',' => self.token(TokenKind::Comma, start),
            '?' => self.token(TokenKind::Question, start),
            '.' => self.token(TokenKind::Dot, start),
            '~' => self.token(TokenKind::BitNot, start),
            ':' => self.two_way(TokenKind::Colon, TokenKind::AssemblyAssign, start),
            '=' => self.two_way(TokenKind::Assign, TokenKind::Eq, start),
            '!' => self.two_way(TokenKind::Not, TokenKind::NotEq, start),
            '%' => self.two_way(TokenKind::Mod, TokenKind::ModAssign, start),
            '^' => self.two_way(TokenKind::BitXor, TokenKind::XorAssign, start),
            '&' => self.three_way(TokenKind::BitAnd, TokenKind::AndAssign, '&', TokenKind::And, start),
            '|' => self.three_way(TokenKind::BitOr, TokenKind::OrAssign, '|', TokenKind::Or, start),
            '+' => self.three_way(TokenKind::Add, TokenKind::AddAssign, '+', TokenKind::Inc, start),
            '*' => self.three_way(TokenKind::Mul, TokenKind::MulAssign, '*', TokenKind::Pow, start),
            '-' => {
                if self.bump_if('>') {
                    self.token(TokenKind::Arrow, start)
                } else {
                    self.three_way(TokenKind::Sub, TokenKind::SubAssign, '-', TokenKind::Dec, start)
                }
            }
            '<' => self.four_way(
                '<',
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Shl,
                TokenKind::ShlAssign,
                start,
            ),
            '>' => self.scan_greater_than(start),
            '/' => match self.peek() {
                Some('/') => self.scan_line_comment(start),
                Some('*') => return Some(self.scan_block_comment(start)),
                _ => self.two_way(TokenKind::Div, TokenKind::DivAssign, start),
            },
            '"' | '\'' => return Some(self.scan_string(c, start)),
            c if c.is_ident_start() => self.scan_word(start),
            c if c.is_ascii_digit() => self.scan_number(c, start),
            c => {
                return Some(self.illegal(
                    LexErrorKind::InvalidCharacter {
                        position: start,
                        character: c,
                    },
                    start,
                ))
            }
        };
        Some(token)
    }

    /// `X` or `X=`.
    fn two_way(&mut self, plain: TokenKind, with_eq: TokenKind, start: usize) -> Token {
        if self.bump_if('=') {
            self.token(with_eq, start)
        } else {
            self.token(plain, start)
        }
    }

    /// `X`, `X=` or `XX`.
    fn three_way(
        &mut self,
        plain: TokenKind,
        with_eq: TokenKind,
        doubled_char: char,
        doubled: TokenKind,
        start: usize,
    ) -> Token {
        if self.bump_if('=') {
            self.token(with_eq, start)
        } else if self.bump_if(doubled_char) {
            self.token(doubled, start)
        } else {
            self.token(plain, start)
        }
    }

    /// `X`, `X=`, `XX` or `XX=`.
    fn four_way(
        &mut self,
        c: char,
        plain: TokenKind,
        with_eq: TokenKind,
        doubled: TokenKind,
        doubled_eq: TokenKind,
        start: usize,
    ) -> Token {
        if self.bump_if('=') {
            self.token(with_eq, start)
        } else if self.bump_if(c) {
            self.two_way(doubled, doubled_eq, start)
        } else {
            self.token(plain, start)
        }
    }

    /// `>` splits six ways: `>` `>=` `>>` `>>=` `>>>` `>>>=`.
    fn scan_greater_than(&mut self, start: usize) -> Token {
        if self.bump_if('=') {
            return self.token(TokenKind::GtEq, start);
        }
        if !self.bump_if('>') {
            return self.token(TokenKind::Gt, start);
        }
        if self.bump_if('=') {
            return self.token(TokenKind::ShrAssign, start);
        }
        if self.bump_if('>') {
            self.two_way(TokenKind::Sar, TokenKind::SarAssign, start)
        } else {
            self.token(TokenKind::Shr, start)
        }
    }

    fn scan_word(&mut self, start: usize) -> Token {
        self.bump_while(|c| c.is_ident_continue());
        let kind = lookup_ident(&self.src[start..self.pos]);
        self.token(kind, start)
    }

    fn scan_number(&mut self, first: char, start: usize) -> Token {
        if first == '0' && (self.peek() == Some('x') || self.peek() == Some('X')) {
            self.bump();
            self.bump_while(|c| c.is_digit_or_separator(16));
            return self.token(TokenKind::HexNumber, start);
        }
        self.bump_while(|c| c.is_digit_or_separator(10));
        // An exponent belongs to the number only when digits follow it,
        // optionally behind a sign.
        if matches!(self.peek(), Some('e') | Some('E')) {
            let after_e = self.peek_nth(1);
            let after_sign = self.peek_nth(2);
            let signed = matches!(after_e, Some('+') | Some('-'));
            let has_digits = if signed {
                after_sign.is_some_and(|c| c.is_ascii_digit())
            } else {
                after_e.is_some_and(|c| c.is_ascii_digit())
            };
            if has_digits {
                self.bump();
                if signed {
                    self.bump();
                }
                self.bump_while(|c| c.is_digit_or_separator(10));
            }
        }
        self.token(TokenKind::DecimalNumber, start)
    }

    fn scan_line_comment(&mut self, start: usize) -> Token {
        self.bump_while(|c| c != '\n');
        self.token(TokenKind::Comment, start)
    }

    fn scan_block_comment(&mut self, start: usize) -> Token {
        self.bump();
        loop {
            match self.bump() {
                None => {
                    return self.illegal(
                        LexErrorKind::UnterminatedMultilineComment { position: start },
                        start,
                    );
                }
                Some('*') if self.bump_if('/') => break,
                Some(_) => {}
            }
        }
        self.token(TokenKind::Comment, start)
    }

    fn scan_string(&mut self, quote: char, start: usize) -> Token {
        loop {
            match self.bump() {
                None => {
                    return self.illegal(
                        LexErrorKind::UnterminatedStringLiteral { position: start },
                        start,
                    );
                }
                Some('\\') => {
                    // The escaped character never terminates the literal.
                    self.bump();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        self.token(TokenKind::StringLiteral, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Runs the scanner to completion over `src`.
///
/// A lexical error has already been recorded on the handler when this
/// returns `Err`; the token sequence is withheld because nothing after an
/// `Illegal` token is trustworthy.
pub fn lex(
    handler: &Handler,
    src: Arc<str>,
    path: Option<Arc<PathBuf>>,
) -> Result<TokenStream, ErrorEmitted> {
    let full_span = Span::from_source(src.clone(), path.clone());
    let mut lexer = Lexer::new(handler, src, path);
    let mut tokens = Vec::new();
    for token in &mut lexer {
        tokens.push(token);
    }
    match lexer.err {
        Some(err) => Err(err),
        None => Ok(TokenStream { tokens, full_span }),
    }
}
