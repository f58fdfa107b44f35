use crate::{
    decl::{ContractDecl, Decl, EventDecl, FunctionDecl, StateVariableDecl, UsingForDirective, UsingTarget},
    expr::Expr,
    statement::{Block, Statement},
    source_unit::SourceUnit,
    ty::{Param, ParamList, Ty},
};
use solfront_types::{Ident, Span, Spanned};

/// A borrowed view of any node in the tree, the currency of [`walk`].
#[derive(Debug, Clone, Copy)]
pub enum AstNode<'a> {
    SourceUnit(&'a SourceUnit),
    Decl(&'a Decl),
    Statement(&'a Statement),
    Block(&'a Block),
    Expr(&'a Expr),
    Ty(&'a Ty),
    ParamList(&'a ParamList),
    Param(&'a Param),
    Ident(&'a Ident),
}

impl Spanned for AstNode<'_> {
    fn span(&self) -> Span {
        match self {
            AstNode::SourceUnit(node) => node.span(),
            AstNode::Decl(node) => node.span(),
            AstNode::Statement(node) => node.span(),
            AstNode::Block(node) => node.span(),
            AstNode::Expr(node) => node.span(),
            AstNode::Ty(node) => node.span(),
            AstNode::ParamList(node) => node.span(),
            AstNode::Param(node) => node.span(),
            AstNode::Ident(node) => node.span(),
        }
    }
}

/// A tree visitor driven by [`walk`].
///
/// `visit(Some(node))` is called before a node's children; returning `false`
/// skips the subtree. After the children, `visit(None)` signals that the
/// subtree is finished. Leaf nodes are presented exactly once.
pub trait Visitor {
    fn visit(&mut self, node: Option<AstNode<'_>>) -> bool;
}

/// Depth-first, pre-order traversal of `node`, visiting children in
/// declaration order.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: AstNode<'_>) {
    if !visitor.visit(Some(node)) {
        return;
    }
    match node {
        AstNode::SourceUnit(source_unit) => {
            for decl in &source_unit.decls {
                walk(visitor, AstNode::Decl(decl));
            }
        }
        AstNode::Decl(decl) => walk_decl(visitor, decl),
        AstNode::Statement(statement) => walk_statement(visitor, statement),
        AstNode::Block(block) => {
            for statement in &block.statements {
                walk(visitor, AstNode::Statement(statement));
            }
        }
        AstNode::Expr(expr) => walk_expr(visitor, expr),
        AstNode::Ty(ty) => walk_ty(visitor, ty),
        AstNode::ParamList(param_list) => {
            for param in &param_list.params {
                walk(visitor, AstNode::Param(param));
            }
        }
        AstNode::Param(param) => {
            walk(visitor, AstNode::Ty(&param.ty));
            if let Some(name) = &param.name {
                walk(visitor, AstNode::Ident(name));
            }
        }
        // Leaf.
        AstNode::Ident(_) => {}
    }
    visitor.visit(None);
}

fn walk_decl<V: Visitor + ?Sized>(visitor: &mut V, decl: &Decl) {
    match decl {
        Decl::Contract(ContractDecl {
            name,
            parents,
            body,
            ..
        }) => {
            walk(visitor, AstNode::Ident(name));
            for parent in parents {
                walk(visitor, AstNode::Ident(parent));
            }
            for decl in &body.decls {
                walk(visitor, AstNode::Decl(decl));
            }
        }
        Decl::Function(FunctionDecl {
            name,
            params,
            results,
            body,
            ..
        }) => {
            walk(visitor, AstNode::Ident(name));
            walk(visitor, AstNode::ParamList(params));
            if let Some(results) = results {
                walk(visitor, AstNode::ParamList(results));
            }
            if let Some(body) = body {
                walk(visitor, AstNode::Block(body));
            }
        }
        Decl::StateVariable(StateVariableDecl {
            ty,
            name,
            initializer,
            ..
        }) => {
            walk(visitor, AstNode::Ty(ty));
            walk(visitor, AstNode::Ident(name));
            if let Some(initializer) = initializer {
                walk(visitor, AstNode::Expr(initializer));
            }
        }
        Decl::Event(EventDecl { name, params, .. }) => {
            walk(visitor, AstNode::Ident(name));
            for param in params {
                walk(visitor, AstNode::Ty(&param.ty));
                if let Some(name) = &param.name {
                    walk(visitor, AstNode::Ident(name));
                }
            }
        }
        Decl::UsingFor(UsingForDirective {
            target, for_type, ..
        }) => {
            match target {
                UsingTarget::Library(name) => walk(visitor, AstNode::Ident(name)),
                UsingTarget::List(items) => {
                    for item in items {
                        walk(visitor, AstNode::Ident(&item.name));
                    }
                }
            }
            if let Some(ty) = for_type {
                walk(visitor, AstNode::Ty(ty));
            }
        }
    }
}

fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::Block(block) => {
            for statement in &block.statements {
                walk(visitor, AstNode::Statement(statement));
            }
        }
        Statement::Unchecked(unchecked) => {
            walk(visitor, AstNode::Block(&unchecked.block));
        }
        Statement::VariableDecl(decl) => {
            walk(visitor, AstNode::Ty(&decl.ty));
            walk(visitor, AstNode::Ident(&decl.name));
            if let Some(initializer) = &decl.initializer {
                walk(visitor, AstNode::Expr(initializer));
            }
        }
        Statement::TupleVariableDecl(decl) => {
            for slot in decl.slots.iter().flatten() {
                walk(visitor, AstNode::Ty(&slot.ty));
                walk(visitor, AstNode::Ident(&slot.name));
            }
            walk(visitor, AstNode::Expr(&decl.initializer));
        }
        Statement::Return(ret) => {
            if let Some(expr) = &ret.expr {
                walk(visitor, AstNode::Expr(expr));
            }
        }
        Statement::Expr(expr_stmt) => {
            walk(visitor, AstNode::Expr(&expr_stmt.expr));
        }
        Statement::If(if_stmt) => {
            walk(visitor, AstNode::Expr(&if_stmt.condition));
            walk(visitor, AstNode::Statement(&if_stmt.then_branch));
            if let Some(else_branch) = &if_stmt.else_branch {
                walk(visitor, AstNode::Statement(else_branch));
            }
        }
    }
}

fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        // Leaves.
        Expr::Identifier(_) | Expr::Number(_) | Expr::Bool(_) | Expr::ElementaryType(_) => {}
        Expr::Prefix { expr, .. } | Expr::Postfix { expr, .. } => {
            walk(visitor, AstNode::Expr(expr));
        }
        Expr::Infix { lhs, rhs, .. } => {
            walk(visitor, AstNode::Expr(lhs));
            walk(visitor, AstNode::Expr(rhs));
        }
        Expr::Call { func, args, .. } => {
            walk(visitor, AstNode::Expr(func));
            for arg in args {
                walk(visitor, AstNode::Expr(arg));
            }
        }
        // The member name is not a free-standing reference; only the target
        // participates in traversal.
        Expr::MemberAccess { expr, .. } => {
            walk(visitor, AstNode::Expr(expr));
        }
    }
}

fn walk_ty<V: Visitor + ?Sized>(visitor: &mut V, ty: &Ty) {
    match ty {
        // Leaves.
        Ty::Elementary(_) | Ty::UserDefined(_) => {}
        Ty::Function(function) => {
            walk(visitor, AstNode::ParamList(&function.params));
            if let Some(results) = &function.results {
                walk(visitor, AstNode::ParamList(results));
            }
        }
    }
}
