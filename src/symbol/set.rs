use super::{Symbol, SymbolSet};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

impl Symbol {
    /// The stable index of the symbol within its set.
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl SymbolSet {
    pub fn new() -> Self {
        Self {
            str2sym: RefCell::new(HashMap::new()),
            sym2str: RefCell::new(Vec::new()),
        }
    }

    /// Intern a name and return its symbol.
    /// A name already present returns the previously assigned symbol.
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(val) = self.str2sym.borrow().get(name) {
            return Symbol(*val);
        }
        let mut sym2str = self.sym2str.borrow_mut();
        let val = sym2str.len();
        sym2str.push(name.to_string());
        self.str2sym.borrow_mut().insert(name.to_string(), val);
        Symbol(val)
    }

    /// Look a name up without interning it.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.str2sym.borrow().get(name).map(|val| Symbol(*val))
    }

    pub fn has(&self, name: &str) -> bool {
        self.str2sym.borrow().contains_key(name)
    }

    /// The textual name of an interned symbol.
    ///
    /// # Panics
    /// Panics if the symbol was interned by a different set.
    pub fn name(&self, symbol: Symbol) -> String {
        self.sym2str.borrow()[symbol.0].clone()
    }

    pub fn len(&self) -> usize {
        self.sym2str.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        SymbolSet::new()
    }
}

impl Debug for SymbolSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sym2str.borrow().iter()).finish()
    }
}
