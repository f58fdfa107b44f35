use crate::parser::{ParseResult, Parser};
use num_bigint::BigUint;
use num_traits::pow;
use solfront_ast::{
    expr::{BoolLit, Expr, NumberLit},
    token::{Token, TokenKind},
    ty::ElementaryTy,
};
use solfront_error::parser_error::ParseErrorKind;
use solfront_types::{Ident, Span, Spanned};

/// Binding strength, weakest first. Comparisons between levels drive the
/// precedence-climbing loop; the derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Comma,
    Assignment,
    // Holds `?:`'s slot in the ladder; no token kind maps to it, so a `?`
    // terminates expression parsing instead.
    Ternary,
    Or,
    And,
    Equality,
    Comparison,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Additive,
    Multiplicative,
    Exponent,
    Prefix,
    Postfix,
}

/// The binding strength `kind` has in infix or postfix position, or `None`
/// if it cannot continue an expression.
fn infix_precedence(kind: TokenKind) -> Option<Precedence> {
    let precedence = match kind {
        k if k.is_assign_op() => Precedence::Assignment,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equality,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Precedence::Comparison,
        TokenKind::BitOr => Precedence::BitOr,
        TokenKind::BitXor => Precedence::BitXor,
        TokenKind::BitAnd => Precedence::BitAnd,
        TokenKind::Shl | TokenKind::Shr | TokenKind::Sar => Precedence::Shift,
        TokenKind::Add | TokenKind::Sub => Precedence::Additive,
        TokenKind::Mul | TokenKind::Div | TokenKind::Mod => Precedence::Multiplicative,
        TokenKind::Pow => Precedence::Exponent,
        TokenKind::Inc | TokenKind::Dec => Precedence::Postfix,
        TokenKind::LParen | TokenKind::Dot => Precedence::Postfix,
        _ => return None,
    };
    Some(precedence)
}

impl Parser<'_, '_> {
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_with(Precedence::Lowest)
    }

    /// Precedence climbing: parse an operand, then fold in operators that
    /// bind tighter than `min`.
    pub(crate) fn parse_expr_with(&mut self, min: Precedence) -> ParseResult<Expr> {
        let mut lhs = self.parse_operand()?;
        while let Some(precedence) = infix_precedence(self.cur_kind()) {
            if precedence <= min {
                break;
            }
            lhs = self.parse_infix(lhs, precedence)?;
        }
        Ok(lhs)
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        match self.cur_kind() {
            TokenKind::Identifier => {
                let token = self.bump();
                Ok(Expr::Identifier(Ident::new(token.span)))
            }
            TokenKind::DecimalNumber | TokenKind::HexNumber => {
                let token = self.bump();
                let value = self.number_value(&token)?;
                Ok(Expr::Number(NumberLit { token, value }))
            }
            TokenKind::True | TokenKind::False => {
                let token = self.bump();
                let value = token.kind == TokenKind::True;
                Ok(Expr::Bool(BoolLit { token, value }))
            }
            TokenKind::Not
            | TokenKind::BitNot
            | TokenKind::Sub
            | TokenKind::Add
            | TokenKind::Inc
            | TokenKind::Dec => {
                let op = self.bump();
                // The operand is parsed at Prefix strength, so postfix
                // operators still bind tighter: `!i++` is `(!(i++))`.
                let expr = Box::new(self.parse_expr_with(Precedence::Prefix)?);
                Ok(Expr::Prefix { op, expr })
            }
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            kind if kind.is_elementary_type() => {
                let token = self.bump();
                Ok(Expr::ElementaryType(ElementaryTy { token }))
            }
            _ => Err(self.emit_error(ParseErrorKind::ExpectedExpression)),
        }
    }

    fn parse_infix(&mut self, lhs: Expr, precedence: Precedence) -> ParseResult<Expr> {
        match self.cur_kind() {
            TokenKind::LParen => self.parse_call(lhs),
            TokenKind::Dot => {
                self.bump();
                let name = self.expect_ident()?;
                Ok(Expr::MemberAccess {
                    expr: Box::new(lhs),
                    name,
                })
            }
            TokenKind::Inc | TokenKind::Dec => {
                let op = self.bump();
                Ok(Expr::Postfix {
                    expr: Box::new(lhs),
                    op,
                })
            }
            kind => {
                if kind.is_assign_op() && !is_assignable(&lhs) {
                    self.emit_error_with_span(ParseErrorKind::UnassignableExpression, lhs.span());
                }
                let op = self.bump();
                // Assignment and exponentiation are right-associative: their
                // right operand reopens the same precedence level.
                let rhs_min = match precedence {
                    Precedence::Assignment => Precedence::Comma,
                    Precedence::Exponent => Precedence::Multiplicative,
                    other => other,
                };
                let rhs = Box::new(self.parse_expr_with(rhs_min)?);
                Ok(Expr::Infix {
                    lhs: Box::new(lhs),
                    op,
                    rhs,
                })
            }
        }
    }

    fn parse_call(&mut self, func: Expr) -> ParseResult<Expr> {
        let start = func.span();
        self.bump();
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr_with(Precedence::Comma)?);
                if self.take(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let rparen = self.expect(TokenKind::RParen)?;
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            span: Span::join(start, rparen.span),
        })
    }

    /// Computes the exact value of a scanned number literal. Separators are
    /// stripped and a decimal exponent is expanded, so `1_0e2` is `1000`.
    fn number_value(&mut self, token: &Token) -> ParseResult<BigUint> {
        let text = token.literal();
        if token.kind == TokenKind::HexNumber {
            let digits: String = text[2..].chars().filter(|c| *c != '_').collect();
            return BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| {
                self.emit_error_with_span(ParseErrorKind::MalformedNumberLiteral, token.span())
            });
        }
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], Some(&text[at + 1..])),
            None => (text, None),
        };
        let digits: String = mantissa.chars().filter(|c| *c != '_').collect();
        let Some(value) = BigUint::parse_bytes(digits.as_bytes(), 10) else {
            return Err(
                self.emit_error_with_span(ParseErrorKind::MalformedNumberLiteral, token.span())
            );
        };
        let Some(exponent) = exponent else {
            return Ok(value);
        };
        // Integers only: a negative exponent has no representable value.
        let digits: String = exponent
            .strip_prefix('+')
            .unwrap_or(exponent)
            .chars()
            .filter(|c| *c != '_')
            .collect();
        match digits.parse::<usize>() {
            Ok(exponent) => Ok(value * pow(BigUint::from(10u32), exponent)),
            Err(_) => Err(
                self.emit_error_with_span(ParseErrorKind::MalformedNumberExponent, token.span())
            ),
        }
    }
}

fn is_assignable(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier(_) | Expr::MemberAccess { .. } => true,
        // Assignment chains: `a = b = c` sees `(b = c)` only as rhs, but a
        // parenthesized lhs still reduces to whatever it wraps.
        Expr::Infix { op, .. } => op.kind.is_assign_op(),
        _ => false,
    }
}
