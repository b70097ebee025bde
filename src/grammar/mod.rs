//! A module consists of the context free grammar representation and its analysis.
//!
//! A [Grammar] is built from a small textual form, one rule per line:
//!
//! ```text
//! E -> E op E
//!   -> ( E )
//!   -> int
//! ```
//!
//! A line with a blank left hand side (or no `->` at all) continues the previous
//! non-terminal, and `->` with an empty right hand side defines an ε production.
//! The order of the productions of a non-terminal is significant; the production
//! index is its priority during disambiguation, with the lowest index winning.
//! The first non-terminal of the grammar is the start symbol, and any symbol
//! without productions is a terminal matched against lexeme kinds.
//!
//! The derived [Analytics] view carries the first sets and the nullability of the
//! leftmost chains. [is_left_recursive] checks a grammar for left recursion and
//! [remove_left_recursion] converts a grammar into an equivalent one without it.
mod analysis;
mod grammar;
mod left_recursion;

use crate::symbol::{Symbol, SymbolSet};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[cfg(test)]
mod __tests__;

pub use left_recursion::{is_left_recursive, remove_left_recursion};

/// An ordered sequence of symbols forming the right hand side of a rule.
/// An empty production derives ε.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Production {
    symbols: Vec<Symbol>,
}

/// The ordered set of productions available from one non-terminal.
/// The index of a production is its priority; lower index wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Productions {
    prods: Vec<Production>,
}

/// A context free grammar: an ordered list of non-terminals, each mapped to
/// its productions. The first non-terminal is the start symbol.
pub struct Grammar {
    set: Rc<SymbolSet>,
    order: Vec<Symbol>,
    productions: HashMap<Symbol, Productions>,
    analytics: OnceCell<Analytics>,
}

/// A derived, read only analysis of a grammar carrying the first sets,
/// the nullability of leftmost chains and the reverse first index.
///
/// Obtained through [Grammar::analytics]; computed once and cached until the
/// grammar is modified.
pub struct Analytics {
    nonterm2firsts: HashMap<Symbol, Vec<Symbol>>,
    first2nonterms: HashMap<Symbol, HashSet<Symbol>>,
    nil_in_first: HashMap<Symbol, bool>,
}
