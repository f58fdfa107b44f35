use crate::{token::Token, ty::ElementaryTy};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use solfront_types::{Ident, Span, Spanned};
use std::fmt;

/// The expression family.
///
/// The `Display` form is the fully parenthesized canonical rendering used by
/// precedence and associativity tests: `a + b * c` renders as
/// `(a + (b * c))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Identifier(Ident),
    Number(NumberLit),
    Bool(BoolLit),
    Prefix {
        op: Token,
        expr: Box<Expr>,
    },
    Postfix {
        expr: Box<Expr>,
        op: Token,
    },
    Infix {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    MemberAccess {
        expr: Box<Expr>,
        name: Ident,
    },
    /// An elementary type keyword in expression position, i.e. the callee of
    /// a cast such as `uint256(x)`.
    ElementaryType(ElementaryTy),
}

/// A number literal together with its exact value. The value is kept as an
/// arbitrary-precision integer: 256-bit contract-language integers must
/// never be truncated to a machine word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberLit {
    pub token: Token,
    pub value: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolLit {
    pub token: Token,
    pub value: bool,
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Identifier(name) => name.span(),
            Expr::Number(number) => number.token.span(),
            Expr::Bool(boolean) => boolean.token.span(),
            Expr::Prefix { op, expr } => Span::join(op.span(), expr.span()),
            Expr::Postfix { expr, op } => Span::join(expr.span(), op.span()),
            Expr::Infix { lhs, rhs, .. } => Span::join(lhs.span(), rhs.span()),
            Expr::Call { span, .. } => span.clone(),
            Expr::MemberAccess { expr, name } => Span::join(expr.span(), name.span()),
            Expr::ElementaryType(elementary) => elementary.span(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Number(number) => write!(f, "{}", number.token.literal()),
            Expr::Bool(boolean) => write!(f, "{}", boolean.value),
            Expr::Prefix { op, expr } => write!(f, "({}{expr})", op.literal()),
            Expr::Postfix { expr, op } => write!(f, "({expr}{})", op.literal()),
            Expr::Infix { lhs, op, rhs } => write!(f, "({lhs} {} {rhs})", op.literal()),
            Expr::Call { func, args, .. } => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::MemberAccess { expr, name } => write!(f, "{expr}.{name}"),
            Expr::ElementaryType(elementary) => write!(f, "{elementary}"),
        }
    }
}
