use crate::symbol::{Symbol, SymbolSet};
use crate::util::Position;
use crate::Lexeme;
use std::fmt::{Display, Formatter};

impl Lexeme {
    pub fn new(kind: Symbol, value: String, position: Position) -> Self {
        Self {
            kind,
            value,
            position,
        }
    }

    /// Create the valueless lexeme carried by synthesised non-terminal nodes.
    pub fn marker(kind: Symbol) -> Self {
        Self {
            kind,
            value: String::new(),
            position: Position::default(),
        }
    }

    /// Render the lexeme as `kind : value` using the names from `set`.
    pub fn display(&self, set: &SymbolSet) -> String {
        if self.value.is_empty() {
            set.name(self.kind)
        } else {
            format!("{} : {}", set.name(self.kind), self.value)
        }
    }
}

impl Display for Lexeme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("")
            .field(&self.kind)
            .field(&self.value)
            .field(&self.position)
            .finish()
    }
}
