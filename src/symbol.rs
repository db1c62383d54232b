use lasso::{Spur, ThreadedRodeo};

/// Interned name of an object, predicate, type or action.
pub type Symbol = Spur;

/// Thread-safe interner for task names.
///
/// Equal strings always intern to the same `Symbol`, so name lookups in a
/// `Task` compare integers rather than strings.
pub struct SymbolStore {
    rodeo: ThreadedRodeo,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Intern `name`, returning the existing symbol if it was seen before.
    pub fn intern(&self, name: &str) -> Symbol {
        self.rodeo.get_or_intern(name)
    }

    /// Resolve a symbol back to its string. `None` for foreign symbols.
    pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
        self.rodeo.try_resolve(&symbol)
    }

    /// Look up a symbol without interning.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.rodeo.get(name)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolStore")
            .field("len", &self.rodeo.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/symbol.rs"]
mod tests;
