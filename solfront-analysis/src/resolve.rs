use crate::{
    environment::Environment,
    symbol::{BaseSymbol, NodeArena, Reference, Symbol, SymbolArena, UsageKind},
};
use solfront_ast::{
    decl::{Decl, UsingTarget},
    expr::Expr,
    source_unit::SourceUnit,
    statement::{Block, Statement},
    token::TokenKind,
    ty::{ParamList, Ty},
};
use solfront_types::{Ident, Span, Spanned};
use tracing::{debug, trace};

/// Everything one resolution pass produces: the symbols with their
/// accumulated references, the node arena the references point into, and
/// the identifier sites no scope could bind.
#[derive(Debug)]
pub struct Resolution {
    pub symbols: SymbolArena,
    pub nodes: NodeArena,
    pub unresolved: Vec<Span>,
}

impl Resolution {
    /// Every symbol declared under `name`, across all scopes, in
    /// declaration order.
    pub fn symbols_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Symbol> {
        self.symbols
            .iter()
            .map(|(_, symbol)| symbol)
            .filter(move |symbol| symbol.name() == name)
    }
}

/// Builds the symbol table of one file.
///
/// Scoping follows the lexical structure: file, contract body, function
/// (parameters and named results), then one scope per block. Members of a
/// file or contract see each other regardless of order; locals only exist
/// from their declaration statement onward.
pub fn resolve(source_unit: &SourceUnit) -> Resolution {
    debug!(decls = source_unit.decls.len(), "resolving source unit");
    let mut resolver = Resolver {
        symbols: SymbolArena::default(),
        nodes: NodeArena::build(source_unit),
        unresolved: Vec::new(),
    };
    let mut root = Environment::new();
    for decl in &source_unit.decls {
        resolver.declare_decl(decl, &mut root);
    }
    for decl in &source_unit.decls {
        resolver.resolve_decl(decl, &root);
    }
    debug!(
        symbols = resolver.symbols.len(),
        unresolved = resolver.unresolved.len(),
        "resolution finished"
    );
    Resolution {
        symbols: resolver.symbols,
        nodes: resolver.nodes,
        unresolved: resolver.unresolved,
    }
}

struct Resolver {
    symbols: SymbolArena,
    nodes: NodeArena,
    unresolved: Vec<Span>,
}

impl Resolver {
    fn declare(&mut self, env: &mut Environment<'_>, symbol: Symbol) {
        trace!(%symbol, "declared");
        let name = symbol.name().to_string();
        let id = self.symbols.insert(symbol);
        env.set(name, id);
    }

    /// The declaration pass of a scope: names only, no bodies, so members
    /// can refer to each other regardless of order.
    fn declare_decl(&mut self, decl: &Decl, env: &mut Environment<'_>) {
        match decl {
            Decl::Contract(contract) => {
                self.declare(env, Symbol::Contract(BaseSymbol::new(&contract.name.span())));
            }
            Decl::Function(function) => {
                self.declare(env, Symbol::Function(BaseSymbol::new(&function.name.span())));
            }
            Decl::StateVariable(state_var) => {
                self.declare(
                    env,
                    Symbol::StateVariable(BaseSymbol::new(&state_var.name.span())),
                );
            }
            Decl::Event(event) => {
                self.declare(env, Symbol::Event(BaseSymbol::new(&event.name.span())));
            }
            // Binds behavior to a type; declares no name of its own.
            Decl::UsingFor(_) => {}
        }
    }

    fn resolve_decl(&mut self, decl: &Decl, env: &Environment<'_>) {
        match decl {
            Decl::Contract(contract) => {
                trace!(name = %contract.name, "entering contract scope");
                for parent in &contract.parents {
                    self.reference(env, parent, UsageKind::Read);
                }
                let mut body_env = Environment::new_enclosed(env);
                for decl in &contract.body.decls {
                    self.declare_decl(decl, &mut body_env);
                }
                for decl in &contract.body.decls {
                    self.resolve_decl(decl, &body_env);
                }
            }
            Decl::Function(function) => {
                trace!(name = %function.name, "entering function scope");
                self.resolve_param_types(&function.params, env);
                if let Some(results) = &function.results {
                    self.resolve_param_types(results, env);
                }
                let mut fn_env = Environment::new_enclosed(env);
                self.declare_params(&function.params, &mut fn_env);
                if let Some(results) = &function.results {
                    self.declare_params(results, &mut fn_env);
                }
                if let Some(body) = &function.body {
                    self.resolve_block(body, &fn_env);
                }
            }
            Decl::StateVariable(state_var) => {
                self.resolve_ty(&state_var.ty, env);
                if let Some(initializer) = &state_var.initializer {
                    self.resolve_expr(initializer, env, UsageKind::Read);
                }
            }
            Decl::Event(event) => {
                for param in &event.params {
                    self.resolve_ty(&param.ty, env);
                }
            }
            Decl::UsingFor(using_for) => {
                match &using_for.target {
                    UsingTarget::Library(name) => self.reference(env, name, UsageKind::Read),
                    UsingTarget::List(items) => {
                        for item in items {
                            self.reference(env, &item.name, UsageKind::Read);
                        }
                    }
                }
                if let Some(ty) = &using_for.for_type {
                    self.resolve_ty(ty, env);
                }
            }
        }
    }

    fn declare_params(&mut self, params: &ParamList, env: &mut Environment<'_>) {
        for param in &params.params {
            if let Some(name) = &param.name {
                self.declare(env, Symbol::Parameter(BaseSymbol::new(&name.span())));
            }
        }
    }

    fn resolve_param_types(&mut self, params: &ParamList, env: &Environment<'_>) {
        for param in &params.params {
            self.resolve_ty(&param.ty, env);
        }
    }

    fn resolve_ty(&mut self, ty: &Ty, env: &Environment<'_>) {
        match ty {
            Ty::Elementary(_) => {}
            Ty::UserDefined(name) => self.reference(env, name, UsageKind::Read),
            Ty::Function(function) => {
                self.resolve_param_types(&function.params, env);
                if let Some(results) = &function.results {
                    self.resolve_param_types(results, env);
                }
            }
        }
    }

    fn resolve_block(&mut self, block: &Block, outer: &Environment<'_>) {
        let mut env = Environment::new_enclosed(outer);
        for statement in &block.statements {
            self.resolve_statement(statement, &mut env);
        }
    }

    fn resolve_statement(&mut self, statement: &Statement, env: &mut Environment<'_>) {
        match statement {
            Statement::Block(block) => self.resolve_block(block, env),
            Statement::Unchecked(unchecked) => self.resolve_block(&unchecked.block, env),
            Statement::VariableDecl(decl) => {
                self.resolve_ty(&decl.ty, env);
                // The initializer cannot see the name it initializes.
                if let Some(initializer) = &decl.initializer {
                    self.resolve_expr(initializer, env, UsageKind::Read);
                }
                self.declare(env, Symbol::Variable(BaseSymbol::new(&decl.name.span())));
            }
            Statement::TupleVariableDecl(decl) => {
                self.resolve_expr(&decl.initializer, env, UsageKind::Read);
                for slot in decl.slots.iter().flatten() {
                    self.resolve_ty(&slot.ty, env);
                    self.declare(env, Symbol::Variable(BaseSymbol::new(&slot.name.span())));
                }
            }
            Statement::Return(ret) => {
                if let Some(expr) = &ret.expr {
                    self.resolve_expr(expr, env, UsageKind::Read);
                }
            }
            Statement::Expr(expr_stmt) => self.resolve_expr(&expr_stmt.expr, env, UsageKind::Read),
            Statement::If(if_stmt) => {
                self.resolve_expr(&if_stmt.condition, env, UsageKind::Read);
                self.resolve_branch(&if_stmt.then_branch, env);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.resolve_branch(else_branch, env);
                }
            }
        }
    }

    /// A branch statement scopes to itself even without braces.
    fn resolve_branch(&mut self, statement: &Statement, outer: &Environment<'_>) {
        let mut env = Environment::new_enclosed(outer);
        self.resolve_statement(statement, &mut env);
    }

    fn resolve_expr(&mut self, expr: &Expr, env: &Environment<'_>, kind: UsageKind) {
        match expr {
            Expr::Identifier(name) => self.reference(env, name, kind),
            Expr::Number(_) | Expr::Bool(_) | Expr::ElementaryType(_) => {}
            Expr::Prefix { op, expr } => {
                let kind = if matches!(op.kind, TokenKind::Inc | TokenKind::Dec) {
                    UsageKind::Write
                } else {
                    UsageKind::Read
                };
                self.resolve_expr(expr, env, kind);
            }
            // Postfix operators are `++`/`--`, both mutations.
            Expr::Postfix { expr, .. } => self.resolve_expr(expr, env, UsageKind::Write),
            Expr::Infix { lhs, op, rhs } => {
                let lhs_kind = if op.kind.is_assign_op() {
                    UsageKind::Write
                } else {
                    UsageKind::Read
                };
                self.resolve_expr(lhs, env, lhs_kind);
                self.resolve_expr(rhs, env, UsageKind::Read);
            }
            Expr::Call { func, args, .. } => {
                match func.as_ref() {
                    Expr::Identifier(name) => self.reference(env, name, UsageKind::Call),
                    other => self.resolve_expr(other, env, UsageKind::Read),
                }
                for arg in args {
                    self.resolve_expr(arg, env, UsageKind::Read);
                }
            }
            // The member name belongs to the target's type, which this pass
            // does not model; only the target resolves here.
            Expr::MemberAccess { expr, .. } => self.resolve_expr(expr, env, UsageKind::Read),
        }
    }

    fn reference(&mut self, env: &Environment<'_>, name: &Ident, kind: UsageKind) {
        let span = name.span();
        let Some(ids) = env.get(name.as_str()).map(<[_]>::to_vec) else {
            debug!(name = %name, offset = span.start(), "unresolved identifier");
            self.unresolved.push(span);
            return;
        };
        trace!(name = %name, %kind, targets = ids.len(), "reference");
        let node = self.nodes.node_for(&span);
        for id in ids {
            self.symbols.get_mut(id).base_mut().references.push(Reference {
                path: span.path().cloned(),
                offset: span.start(),
                kind,
                node,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use solfront_parse::parse;

    fn resolve_source(text: &str) -> Resolution {
        let (unit, diagnostics) = parse("test.sol", text);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        resolve(&unit)
    }

    #[test]
    fn state_variables_are_visible_to_every_function() {
        let resolution = resolve_source(
            "contract C {\n\
                 function bump() public { counter += 1; }\n\
                 uint256 counter;\n\
             }",
        );
        let counter = resolution.symbols_named("counter").next().unwrap();
        assert_matches!(counter, Symbol::StateVariable(_));
        // Declared after its use in source order, referenced regardless.
        assert_eq!(counter.references().len(), 1);
        assert_eq!(counter.references()[0].kind, UsageKind::Write);
        assert!(resolution.unresolved.is_empty());
    }

    #[test]
    fn usage_kinds_are_classified() {
        let resolution = resolve_source(
            "contract C {\n\
                 uint256 a;\n\
                 uint256 b;\n\
                 function f() public { a = b + 1; f(); b++; }\n\
             }",
        );
        let a = resolution.symbols_named("a").next().unwrap();
        assert_eq!(a.references()[0].kind, UsageKind::Write);
        let b = resolution.symbols_named("b").next().unwrap();
        let kinds: Vec<UsageKind> = b.references().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [UsageKind::Read, UsageKind::Write]);
        let f = resolution.symbols_named("f").next().unwrap();
        assert_matches!(f, Symbol::Function(_));
        assert_eq!(f.references()[0].kind, UsageKind::Call);
    }

    #[test]
    fn locals_shadow_state_and_die_with_their_block() {
        let resolution = resolve_source(
            "contract C {\n\
                 uint256 x;\n\
                 function f() public {\n\
                     { uint256 x = 1; x = 2; }\n\
                     x = 3;\n\
                 }\n\
             }",
        );
        let mut all_x = resolution.symbols_named("x");
        let state_x = all_x.next().unwrap();
        let local_x = all_x.next().unwrap();
        assert_matches!(state_x, Symbol::StateVariable(_));
        assert_matches!(local_x, Symbol::Variable(_));
        // The inner write hits the local; the outer write hits the state
        // variable after the block scope is gone.
        assert_eq!(local_x.references().len(), 1);
        assert_eq!(state_x.references().len(), 1);
    }

    #[test]
    fn parameters_and_named_results_are_in_scope() {
        let resolution = resolve_source(
            "contract C {\n\
                 function add(uint256 lhs, uint256 rhs) public returns (uint256 sum) {\n\
                     sum = lhs + rhs;\n\
                     return sum;\n\
                 }\n\
             }",
        );
        assert!(resolution.unresolved.is_empty());
        let sum = resolution.symbols_named("sum").next().unwrap();
        assert_matches!(sum, Symbol::Parameter(_));
        assert_eq!(sum.references().len(), 2);
        let lhs = resolution.symbols_named("lhs").next().unwrap();
        assert_eq!(lhs.references()[0].kind, UsageKind::Read);
    }

    #[test]
    fn unresolved_identifiers_are_collected_not_fatal() {
        let resolution = resolve_source(
            "contract C { function f() public { ghost = 1; } }",
        );
        assert_eq!(resolution.unresolved.len(), 1);
        assert_eq!(resolution.unresolved[0].as_str(), "ghost");
    }

    #[test]
    fn redeclaration_appends_to_the_overload_list() {
        let resolution = resolve_source(
            "contract C {\n\
                 function f() public {}\n\
                 function f() public {}\n\
                 function g() public { f(); }\n\
             }",
        );
        let overloads: Vec<&Symbol> = resolution.symbols_named("f").collect();
        assert_eq!(overloads.len(), 2);
        // One call site, recorded against both candidates.
        assert_eq!(overloads[0].references().len(), 1);
        assert_eq!(overloads[1].references().len(), 1);
    }

    #[test]
    fn contract_parents_and_using_targets_resolve() {
        let resolution = resolve_source(
            "contract Base { }\n\
             contract Lib { }\n\
             contract C is Base {\n\
                 using Lib for uint256;\n\
             }",
        );
        assert!(resolution.unresolved.is_empty());
        let base = resolution.symbols_named("Base").next().unwrap();
        assert_matches!(base, Symbol::Contract(_));
        assert_eq!(base.references().len(), 1);
        let lib = resolution.symbols_named("Lib").next().unwrap();
        assert_eq!(lib.references().len(), 1);
    }

    #[test]
    fn references_back_link_into_the_node_arena() {
        let resolution = resolve_source(
            "contract C { uint256 a; function f() public { a = 1; } }",
        );
        let a = resolution.symbols_named("a").next().unwrap();
        let reference = &a.references()[0];
        let span = resolution.nodes.span(reference.node);
        assert_eq!(span.as_str(), "a");
        assert_eq!(span.start(), reference.offset);
    }

    #[test]
    fn tuple_slots_declare_locals() {
        let resolution = resolve_source(
            "contract C {\n\
                 function split() public returns (uint256, uint256) {}\n\
                 function f() public {\n\
                     (uint256 hi,, uint256 lo) = split();\n\
                     hi = lo;\n\
                 }\n\
             }",
        );
        assert!(resolution.unresolved.is_empty());
        let hi = resolution.symbols_named("hi").next().unwrap();
        assert_eq!(hi.references()[0].kind, UsageKind::Write);
        let split = resolution.symbols_named("split").next().unwrap();
        assert_eq!(split.references()[0].kind, UsageKind::Call);
    }
}
