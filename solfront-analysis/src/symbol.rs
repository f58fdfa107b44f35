use indexmap::IndexMap;
use solfront_ast::{walk, AstNode, SourceUnit, Visitor};
use solfront_types::{Span, Spanned};
use std::{fmt, path::PathBuf, sync::Arc};

/// A handle to a [`Symbol`] in a [`SymbolArena`].
///
/// Scopes and references hold handles, never the symbols themselves, so a
/// symbol can keep accumulating references after its declaring scope has
/// been torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// A handle to a node in a [`NodeArena`]: the non-owning back-link from a
/// reference to the syntax node that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// How a name is being used at a reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    Read,
    Write,
    Call,
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            UsageKind::Read => "read",
            UsageKind::Write => "write",
            UsageKind::Call => "call",
        };
        write!(f, "{s}")
    }
}

/// One use of a symbol: where, how, and which node did it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub path: Option<Arc<PathBuf>>,
    pub offset: usize,
    pub kind: UsageKind,
    pub node: NodeId,
}

/// The data every symbol variant carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSymbol {
    pub name: String,
    pub path: Option<Arc<PathBuf>>,
    pub offset: usize,
    pub references: Vec<Reference>,
}

impl BaseSymbol {
    pub fn new(name_span: &Span) -> BaseSymbol {
        BaseSymbol {
            name: name_span.as_str().to_string(),
            path: name_span.path().cloned(),
            offset: name_span.start(),
            references: Vec::new(),
        }
    }
}

/// A declared name, by declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Contract(BaseSymbol),
    Function(BaseSymbol),
    StateVariable(BaseSymbol),
    Event(BaseSymbol),
    Parameter(BaseSymbol),
    Variable(BaseSymbol),
}

impl Symbol {
    pub fn base(&self) -> &BaseSymbol {
        match self {
            Symbol::Contract(base)
            | Symbol::Function(base)
            | Symbol::StateVariable(base)
            | Symbol::Event(base)
            | Symbol::Parameter(base)
            | Symbol::Variable(base) => base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseSymbol {
        match self {
            Symbol::Contract(base)
            | Symbol::Function(base)
            | Symbol::StateVariable(base)
            | Symbol::Event(base)
            | Symbol::Parameter(base)
            | Symbol::Variable(base) => base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn offset(&self) -> usize {
        self.base().offset
    }

    pub fn references(&self) -> &[Reference] {
        &self.base().references
    }

    fn kind_str(&self) -> &'static str {
        match self {
            Symbol::Contract(_) => "contract",
            Symbol::Function(_) => "function",
            Symbol::StateVariable(_) => "state variable",
            Symbol::Event(_) => "event",
            Symbol::Parameter(_) => "parameter",
            Symbol::Variable(_) => "variable",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let base = self.base();
        write!(f, "{} {}@{}", self.kind_str(), base.name, base.offset)
    }
}

/// Owns every symbol produced by one analysis pass.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn insert(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A per-file arena of node spans, indexed by byte range.
///
/// References back-link to nodes through [`NodeId`] handles into this arena
/// instead of borrowing the tree, so resolution output stands on its own.
#[derive(Debug, Default)]
pub struct NodeArena {
    spans: Vec<Span>,
    by_range: IndexMap<(usize, usize), NodeId>,
}

impl NodeArena {
    /// Registers every node of `source_unit`, in traversal order.
    pub fn build(source_unit: &SourceUnit) -> NodeArena {
        struct Collector {
            arena: NodeArena,
        }

        impl Visitor for Collector {
            fn visit(&mut self, node: Option<AstNode<'_>>) -> bool {
                if let Some(node) = node {
                    self.arena.insert(node.span());
                }
                true
            }
        }

        let mut collector = Collector {
            arena: NodeArena::default(),
        };
        walk(&mut collector, AstNode::SourceUnit(source_unit));
        collector.arena
    }

    fn insert(&mut self, span: Span) -> NodeId {
        let range = (span.start(), span.end());
        if let Some(id) = self.by_range.get(&range) {
            return *id;
        }
        let id = NodeId(self.spans.len() as u32);
        self.spans.push(span);
        self.by_range.insert(range, id);
        id
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.spans[id.0 as usize]
    }

    /// The node covering exactly `span`, if the tree has one.
    pub fn node_covering(&self, span: &Span) -> Option<NodeId> {
        self.by_range.get(&(span.start(), span.end())).copied()
    }

    /// Like [`node_covering`](Self::node_covering), but registers the span
    /// when the build walk never produced a node for it.
    pub(crate) fn node_for(&mut self, span: &Span) -> NodeId {
        match self.node_covering(span) {
            Some(id) => id,
            None => self.insert(span.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn span_of(text: &str, needle: &str) -> Span {
        let src: Arc<str> = text.into();
        let start = text.find(needle).unwrap();
        Span::new(src, start, start + needle.len(), None).unwrap()
    }

    #[test]
    fn symbols_render_their_debug_string() {
        let span = span_of("contract Vault {}", "Vault");
        let symbol = Symbol::Contract(BaseSymbol::new(&span));
        assert_eq!(symbol.to_string(), "contract Vault@9");
        assert_eq!(symbol.name(), "Vault");
        assert_eq!(symbol.offset(), 9);
    }

    #[test]
    fn arena_hands_out_stable_ids() {
        let mut arena = SymbolArena::default();
        let a = arena.insert(Symbol::Function(BaseSymbol::new(&span_of("f()", "f"))));
        let b = arena.insert(Symbol::Variable(BaseSymbol::new(&span_of("x;", "x"))));
        assert_ne!(a, b);
        assert_eq!(arena.get(a).name(), "f");
        arena.get_mut(b).base_mut().references.push(Reference {
            path: None,
            offset: 7,
            kind: UsageKind::Read,
            node: NodeId(0),
        });
        assert_eq!(arena.get(b).references().len(), 1);
    }

    #[test]
    fn node_arena_is_keyed_by_byte_range() {
        let (unit, diagnostics) = solfront_parse::parse("t.sol", "uint256 counter;");
        assert!(diagnostics.is_empty());
        let nodes = NodeArena::build(&unit);
        assert!(!nodes.is_empty());
        let name_span = match &unit.decls[0] {
            solfront_ast::Decl::StateVariable(decl) => decl.name.span(),
            other => panic!("expected a state variable, got {other:?}"),
        };
        let id = nodes.node_covering(&name_span).unwrap();
        assert_eq!(nodes.span(id).as_str(), "counter");
    }
}
