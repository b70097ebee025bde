//! A module consists of the symbol interner shared by the lexer, grammar and reducer.
//!
//! Every textual symbol name is interned once into a [SymbolSet] and replaced by a
//! small integer id ([Symbol]). Equality, ordering and hashing of symbols use the id
//! only, so symbol comparison during lexing and parsing never touches the strings.
//! The lexer, grammar, parsers and reducer of one pipeline must share a single set;
//! symbols from different sets are unrelated even when their names match.
mod set;

use std::cell::RefCell;
use std::collections::HashMap;

#[cfg(test)]
mod __tests__;

/// An interned symbol id. Cheap to copy and compare.
///
/// A symbol is only meaningful together with the [SymbolSet] that assigned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) usize);

/// An interning table mapping symbol names to stable integer ids and back.
///
/// The set hands out ids in insertion order and an id never changes once
/// assigned. Interning goes through interior mutability so the set can be
/// shared behind an [Rc](std::rc::Rc) by every component of a pipeline.
pub struct SymbolSet {
    str2sym: RefCell<HashMap<String, usize>>,
    sym2str: RefCell<Vec<String>>,
}
