use crate::{
    expr::Expr,
    ty::{DataLocation, Ty},
};
use serde::{Deserialize, Serialize};
use solfront_types::{Ident, Span, Spanned};

/// The statement family.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    Block(Block),
    Unchecked(UncheckedBlock),
    VariableDecl(VariableDeclStmt),
    TupleVariableDecl(TupleVariableDeclStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
    If(IfStmt),
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Block(block) => block.span.clone(),
            Statement::Unchecked(unchecked) => unchecked.span.clone(),
            Statement::VariableDecl(decl) => decl.span.clone(),
            Statement::TupleVariableDecl(decl) => decl.span.clone(),
            Statement::Return(ret) => ret.span.clone(),
            Statement::Expr(expr) => expr.span.clone(),
            Statement::If(if_stmt) => if_stmt.span.clone(),
        }
    }
}

/// A brace-delimited statement list. The span covers the braces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UncheckedBlock {
    pub block: Block,
    pub span: Span,
}

/// `ty [location] name [= initializer];`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableDeclStmt {
    pub ty: Ty,
    pub location: DataLocation,
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// A parenthesized destructuring declaration, `(a, , b) = rhs;`.
///
/// The slot list preserves the comma-separated positions of the source:
/// `slots.len()` equals the number of positions including omitted ones, and
/// an omitted position is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleVariableDeclStmt {
    pub slots: Vec<Option<TupleSlot>>,
    pub initializer: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleSlot {
    pub ty: Ty,
    pub location: DataLocation,
    pub name: Ident,
}

impl Spanned for TupleSlot {
    fn span(&self) -> Span {
        Span::join(self.ty.span(), self.name.span())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub expr: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}
