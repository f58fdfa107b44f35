//! Solfront's token model and abstract syntax tree.
//!
//! The tree is four closed node families (expressions, statements,
//! declarations, types), each a tagged union matched exhaustively by its
//! consumers, so adding a variant is a compile-time-checked change
//! everywhere. Every node is [`Spanned`](solfront_types::Spanned) and
//! renders a canonical debug string via `Display`.

pub mod decl;
pub mod expr;
pub mod source_unit;
pub mod statement;
pub mod token;
pub mod ty;
pub mod walker;

pub use decl::{
    ContractBody, ContractDecl, Decl, EventDecl, EventParam, FunctionDecl, StateVariableDecl,
    UsingAlias, UsingForDirective, UsingItem, UsingTarget,
};
pub use expr::{BoolLit, Expr, NumberLit};
pub use source_unit::SourceUnit;
pub use statement::{
    Block, ExprStmt, IfStmt, ReturnStmt, Statement, TupleSlot, TupleVariableDeclStmt,
    UncheckedBlock, VariableDeclStmt,
};
pub use token::{lookup_ident, Token, TokenKind, ELEMENTARY_TYPES, KEYWORDS};
pub use ty::{DataLocation, ElementaryTy, FunctionTy, Mutability, Param, ParamList, Ty, Visibility};
pub use walker::{walk, AstNode, Visitor};
