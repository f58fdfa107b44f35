use crate::symbol::SymbolId;
use indexmap::IndexMap;

/// One lexical scope: an ordered map from name to the symbols declared
/// under that name, with a non-owning link to the enclosing scope.
///
/// `set` only ever appends. Several symbols under one name model overload
/// sets and redeclarations, which are not errors here; later semantic
/// checks read the whole list. A scope lives exactly as long as the walk of
/// its owning syntax node, which the borrow on `outer` enforces.
#[derive(Debug, Default)]
pub struct Environment<'a> {
    store: IndexMap<String, Vec<SymbolId>>,
    outer: Option<&'a Environment<'a>>,
}

impl<'a> Environment<'a> {
    /// The root scope of a file.
    pub fn new() -> Environment<'static> {
        Environment {
            store: IndexMap::new(),
            outer: None,
        }
    }

    /// A scope nested inside `outer`; lookups that miss here fall through
    /// to it.
    pub fn new_enclosed(outer: &'a Environment<'a>) -> Environment<'a> {
        Environment {
            store: IndexMap::new(),
            outer: Some(outer),
        }
    }

    /// Appends `symbol` to `name`'s list in this scope.
    pub fn set(&mut self, name: impl Into<String>, symbol: SymbolId) {
        self.store.entry(name.into()).or_default().push(symbol);
    }

    /// The innermost non-empty list declared under `name`, searching
    /// outward through enclosing scopes.
    pub fn get(&self, name: &str) -> Option<&[SymbolId]> {
        match self.store.get(name) {
            Some(symbols) if !symbols.is_empty() => Some(symbols),
            _ => self.outer.and_then(|outer| outer.get(name)),
        }
    }

    /// Names declared directly in this scope, in declaration order.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{BaseSymbol, Symbol, SymbolArena};
    use solfront_types::Span;

    fn symbol(arena: &mut SymbolArena, name: &str) -> SymbolId {
        let src: std::sync::Arc<str> = name.into();
        let span = Span::new(src, 0, name.len(), None).unwrap();
        arena.insert(Symbol::Variable(BaseSymbol::new(&span)))
    }

    #[test]
    fn set_appends_instead_of_overwriting() {
        let mut arena = SymbolArena::default();
        let first = symbol(&mut arena, "f");
        let second = symbol(&mut arena, "f");
        let mut env = Environment::new();
        env.set("f", first);
        env.set("f", second);
        assert_eq!(env.get("f"), Some(&[first, second][..]));
    }

    #[test]
    fn lookup_falls_through_to_the_outer_scope() {
        let mut arena = SymbolArena::default();
        let outer_x = symbol(&mut arena, "x");
        let outer_y = symbol(&mut arena, "y");
        let inner_x = symbol(&mut arena, "x");

        let mut root = Environment::new();
        root.set("x", outer_x);
        root.set("y", outer_y);

        let mut inner = Environment::new_enclosed(&root);
        inner.set("x", inner_x);

        // Shadowing: the inner list wins without merging.
        assert_eq!(inner.get("x"), Some(&[inner_x][..]));
        assert_eq!(inner.get("y"), Some(&[outer_y][..]));
        assert_eq!(inner.get("z"), None);
        assert_eq!(root.get("x"), Some(&[outer_x][..]));
    }

    #[test]
    fn deeply_nested_scopes_chain() {
        let mut arena = SymbolArena::default();
        let a = symbol(&mut arena, "a");
        let mut root = Environment::new();
        root.set("a", a);
        let contract = Environment::new_enclosed(&root);
        let function = Environment::new_enclosed(&contract);
        let block = Environment::new_enclosed(&function);
        assert_eq!(block.get("a"), Some(&[a][..]));
    }
}
