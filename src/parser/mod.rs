//! A module consists of the two parsers consuming a lexeme stream into a parse tree.
//!
//! [TopDown] is a recursive descent parser with complete memoisation. It is
//! the simpler and usually faster of the two, but it cannot handle left
//! recursive grammars and rejects them at construction.
//!
//! [Packrat] is a worklist driven chart parser which parses any context free
//! grammar, including left recursive and cyclic ones, in polynomial time.
//! When several derivations cover the same input it keeps the one using the
//! lowest indexed production at each disambiguation point, so the order of
//! the productions in the grammar is the order of preference.
//!
//! Both implement [IParser](crate::IParser): a parse either returns a tree
//! whose terminal leaves reproduce the input lexemes exactly, or [None].
mod packrat;
mod topdown;

#[cfg(test)]
mod __tests__;

pub use packrat::Packrat;
pub use topdown::TopDown;
